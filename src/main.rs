use clap::{Args, Parser, Subcommand};
use serial_battleship::{
    init_logging, DefeatReport, GameSession, SessionConfig, SessionNode, StrategyKind, TcpLink,
    DEFAULT_DEVICE_NAME, DEFAULT_TARGET_GAMES,
};
use tokio::net::TcpListener;
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    session: SessionArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SessionArgs {
    /// Device name sent in the start acknowledgement.
    #[arg(long, default_value = DEFAULT_DEVICE_NAME)]
    name: String,
    /// Games to play before idling.
    #[arg(long, default_value_t = DEFAULT_TARGET_GAMES)]
    games: u32,
    #[arg(long, value_enum, default_value_t = StrategyKind::Checkerboard)]
    strategy: StrategyKind,
    /// How the shot that sinks our last ship is answered.
    #[arg(long, value_enum, default_value_t = DefeatReport::SuppressFinalHit)]
    defeat_report: DefeatReport,
    /// Poll period in milliseconds.
    #[arg(long, default_value_t = 1)]
    poll_ms: u64,
    /// Warn when the peer stays silent this many seconds mid-game.
    #[arg(long)]
    silence_warning_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to a serial-to-TCP bridge.
    Connect {
        #[arg(long, default_value = "127.0.0.1:7000")]
        addr: String,
    },
    /// Wait for the host to connect.
    Listen {
        #[arg(long, default_value = "0.0.0.0:7000")]
        bind: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let link = match cli.command {
        Commands::Connect { addr } => {
            log::info!("connecting to {}", addr);
            TcpLink::connect(&addr).await?
        }
        Commands::Listen { bind } => {
            let listener = TcpListener::bind(&bind).await?;
            log::info!("waiting for the host on {}", bind);
            let (stream, peer) = listener.accept().await?;
            log::info!("host connected from {}", peer);
            stream.set_nodelay(true)?;
            TcpLink::new(stream)
        }
    };

    let args = cli.session;
    let config = SessionConfig {
        device_name: args.name,
        target_games: args.games,
        defeat_report: args.defeat_report,
        strategy: args.strategy,
    };
    let mut node = SessionNode::new(GameSession::new(config), Box::new(link));
    if let Some(secs) = args.silence_warning_secs {
        node = node.with_silence_warning(Duration::from_secs(secs));
    }

    let stats = node.run(Duration::from_millis(args.poll_ms.max(1))).await?;
    log::info!(
        "tournament over: won {} of {} games",
        stats.games_won,
        stats.games_played
    );
    Ok(())
}
