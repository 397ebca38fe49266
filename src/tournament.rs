use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::SessionConfig;
use crate::host::{HostPeer, HostStats};
use crate::node::SessionNode;
use crate::session::{GameSession, SessionStats};
use crate::transport::in_memory::InMemoryLink;
use crate::transport::LineTransport;

/// Outcome of a simulated tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TournamentReport {
    pub device: SessionStats,
    pub host: HostStats,
    pub ticks: u64,
}

/// Play a device session against a simulated host over an in-memory link
/// until both sides have finished `config.target_games` games.
///
/// Both sides tick in lockstep. Fails when the tournament has not finished
/// after `max_ticks` ticks.
pub async fn run_tournament(
    config: SessionConfig,
    seed: u64,
    max_ticks: u64,
) -> anyhow::Result<TournamentReport> {
    let target_games = config.effective_target_games();
    let (device_link, mut host_link) = InMemoryLink::pair();
    let mut node = SessionNode::new(GameSession::new(config), Box::new(device_link));
    let mut host = HostPeer::new(SmallRng::seed_from_u64(seed), target_games);

    let mut ticks = 0u64;
    while !(node.session().is_finished() && host.is_done()) {
        if ticks >= max_ticks {
            anyhow::bail!(
                "tournament unfinished after {} ticks (device {:?}, {} games)",
                ticks,
                node.session().state(),
                node.session().games_played()
            );
        }
        ticks += 1;

        node.poll_once().await?;
        let line = host_link.try_receive_line();
        for msg in host.step(line.as_deref()) {
            let wire = msg.encode().map_err(|e| anyhow::anyhow!(e))?;
            host_link.send(&wire).await?;
        }
    }

    Ok(TournamentReport {
        device: node.session().stats(),
        host: host.stats(),
        ticks,
    })
}
