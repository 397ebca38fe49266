use tokio::time::{interval, Duration, Instant, MissedTickBehavior};

use log::{debug, warn};

use crate::session::{GameSession, SessionState, SessionStats};
use crate::transport::LineTransport;

/// Drives a [`GameSession`] over a [`LineTransport`], one poll per tick.
pub struct SessionNode {
    session: GameSession,
    transport: Box<dyn LineTransport>,
    silence_warning: Option<Duration>,
    waiting_since: Option<Instant>,
    warned: bool,
}

impl SessionNode {
    pub fn new(session: GameSession, transport: Box<dyn LineTransport>) -> Self {
        Self {
            session,
            transport,
            silence_warning: None,
            waiting_since: None,
            warned: false,
        }
    }

    /// Log a warning when the peer stays silent for longer than `after`
    /// while we wait for its shot or its answer. The session keeps waiting.
    pub fn with_silence_warning(mut self, after: Duration) -> Self {
        self.silence_warning = Some(after);
        self
    }

    /// One poll tick: read at most one line, advance the session and send
    /// whatever it produced, in order.
    pub async fn poll_once(&mut self) -> anyhow::Result<()> {
        let line = self.transport.try_receive_line();
        if let Some(l) = &line {
            debug!("<- {}", l);
        }
        let before = self.session.state();
        let outgoing = self.session.step(line.as_deref());
        for msg in outgoing {
            let wire = msg.encode().map_err(|e| anyhow::anyhow!(e))?;
            debug!("-> {}", wire.trim_end());
            self.transport.send(&wire).await?;
        }
        self.watch_silence(before, line.is_some());
        Ok(())
    }

    /// Poll every `poll_interval` until the session has played all its games.
    pub async fn run(&mut self, poll_interval: Duration) -> anyhow::Result<SessionStats> {
        let mut ticker = interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        while !self.session.is_finished() {
            ticker.tick().await;
            if self.transport.is_closed() {
                return Err(anyhow::anyhow!(
                    "link closed in {:?} after {} games",
                    self.session.state(),
                    self.session.games_played()
                ));
            }
            self.poll_once().await?;
        }
        Ok(self.session.stats())
    }

    fn watch_silence(&mut self, before: SessionState, received: bool) {
        let Some(limit) = self.silence_warning else {
            return;
        };
        let state = self.session.state();
        let waiting = matches!(
            state,
            SessionState::DefenseTurn | SessionState::AwaitingOwnShotResult
        );
        if !waiting || received || state != before {
            self.waiting_since = None;
            self.warned = false;
            return;
        }
        let since = *self.waiting_since.get_or_insert_with(Instant::now);
        if !self.warned && since.elapsed() > limit {
            warn!("peer silent for {:?} in {:?}", since.elapsed(), state);
            self.warned = true;
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// True once the silence warning fired for the current wait.
    pub fn silence_reported(&self) -> bool {
        self.warned
    }
}
