use clap::Parser;
use serial_battleship::{
    init_logging, run_tournament, DefeatReport, SessionConfig, StrategyKind,
    DEFAULT_DEVICE_NAME,
};

/// Play a device session against a simulated host and print a JSON report.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long, help = "Fix the host RNG seed for reproducible tournaments")]
    seed: Option<u64>,
    #[arg(long, default_value_t = 10)]
    games: u32,
    #[arg(long, value_enum, default_value_t = StrategyKind::Checkerboard)]
    strategy: StrategyKind,
    #[arg(long, value_enum, default_value_t = DefeatReport::SuppressFinalHit)]
    defeat_report: DefeatReport,
    #[arg(long, default_value_t = 1_000_000)]
    max_ticks: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(rand::random);

    let config = SessionConfig {
        device_name: DEFAULT_DEVICE_NAME.to_string(),
        target_games: cli.games,
        defeat_report: cli.defeat_report,
        strategy: cli.strategy,
    };
    let report = run_tournament(config, seed, cli.max_ticks).await?;

    let result = serde_json::json!({
        "seed": seed,
        "report": report,
    });
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
