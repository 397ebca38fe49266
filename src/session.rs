//! The device's protocol state machine.
//!
//! [`GameSession`] is driven one poll tick at a time: each call to
//! [`GameSession::step`] consumes at most one received line and returns the
//! messages to send, in order. Lines that do not parse, or that are not
//! expected in the current state, are dropped without any state change.

use alloc::boxed::Box;
use alloc::vec::Vec;

use log::{debug, info, trace, warn};

use crate::board::{Board, PlacementReport, TrackingBoard};
use crate::common::{Coord, ShotOutcome};
use crate::config::{SessionConfig, BOARD_SIZE, FLEET};
use crate::protocol::{DeviceMessage, FieldRow, HostMessage};
use crate::ship::Ship;
use crate::targeting::Targeting;

/// Protocol states of a device session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionState {
    WaitingStart,
    WaitingChecksum,
    /// The peer is attacking; waiting for its shot.
    DefenseTurn,
    /// Our turn to fire. Never observed between ticks: the session fires
    /// and moves on within the tick that entered it.
    OffenseTurn,
    AwaitingOwnShotResult,
    GameOver,
}

/// How the shot that sinks our last ship is answered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(clap::ValueEnum))]
pub enum DefeatReport {
    /// Send nothing for the final hit; the field reveal follows directly.
    #[default]
    SuppressFinalHit,
    /// Answer the final hit with `DH_BOOM_H`, then reveal the field.
    ReportFinalHit,
}

/// Result of a finished game from the device's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GameResult {
    Won,
    Lost,
}

/// Counters of a session, cumulative across games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionStats {
    pub games_played: u32,
    pub games_won: u32,
    pub target_games: u32,
    pub state: SessionState,
}

pub struct GameSession {
    config: SessionConfig,
    fleet: Vec<Ship>,
    strategy: Box<dyn Targeting + Send>,
    state: SessionState,
    own: Board,
    original: Board,
    tracking: TrackingBoard,
    placement: PlacementReport,
    hit_count: usize,
    pending_shot: Option<Coord>,
    result: Option<GameResult>,
    games_played: u32,
    games_won: u32,
}

impl GameSession {
    /// Session with the canonical fleet and the configured strategy.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_fleet(config, &FLEET)
    }

    /// Session placing `fleet` at the start of every game.
    pub fn with_fleet(config: SessionConfig, fleet: &[Ship]) -> Self {
        let strategy = config.strategy.build();
        Self::with_strategy(config, fleet, strategy)
    }

    pub fn with_strategy(
        config: SessionConfig,
        fleet: &[Ship],
        strategy: Box<dyn Targeting + Send>,
    ) -> Self {
        let mut session = Self {
            config,
            fleet: fleet.to_vec(),
            strategy,
            state: SessionState::WaitingStart,
            own: Board::new(),
            original: Board::new(),
            tracking: TrackingBoard::new(),
            placement: PlacementReport::default(),
            hit_count: 0,
            pending_shot: None,
            result: None,
            games_played: 0,
            games_won: 0,
        };
        session.new_generation();
        session
    }

    /// Run one poll tick with the line received during it, if any.
    pub fn step(&mut self, line: Option<&str>) -> Vec<DeviceMessage> {
        let mut out = Vec::new();
        let msg = line.and_then(|l| self.receive(l));

        match (self.state, msg) {
            (SessionState::WaitingStart, Some(HostMessage::Start)) => {
                out.push(DeviceMessage::StartAck(self.config.device_name.clone()));
                self.transition(SessionState::WaitingChecksum);
            }
            (SessionState::WaitingChecksum, Some(HostMessage::ChecksumRequest { host })) => {
                if let Some(cs) = host {
                    debug!("host checksum {:?}", cs.counts());
                }
                out.push(DeviceMessage::Checksum(self.own.compute_row_checksum()));
                self.transition(SessionState::DefenseTurn);
            }
            (SessionState::DefenseTurn, Some(HostMessage::Shot(coord))) => {
                self.defend(coord, &mut out);
            }
            (SessionState::AwaitingOwnShotResult, Some(HostMessage::ShotResult(outcome))) => {
                match self.pending_shot.take() {
                    Some(coord) => self.tracking.mark(coord, outcome),
                    None => warn!("shot result {:?} without a pending shot", outcome),
                }
                self.transition(SessionState::DefenseTurn);
            }
            (SessionState::AwaitingOwnShotResult, Some(HostMessage::FieldReveal(_))) => {
                self.result = Some(GameResult::Won);
                self.transition(SessionState::GameOver);
            }
            (SessionState::GameOver, _) => self.finish_game(&mut out),
            (state, Some(other)) => trace!("ignoring {:?} in {:?}", other, state),
            (_, None) => {}
        }

        if self.state == SessionState::OffenseTurn {
            self.attack(&mut out);
        }
        out
    }

    fn receive(&self, line: &str) -> Option<HostMessage> {
        match HostMessage::parse(line) {
            Ok(msg) => Some(msg),
            Err(e) => {
                trace!("discarding {:?} in {:?}: {}", line, self.state, e);
                None
            }
        }
    }

    fn defend(&mut self, (row, col): Coord, out: &mut Vec<DeviceMessage>) {
        let outcome = self.own.apply_incoming_shot(row, col);
        if outcome.is_hit() {
            self.hit_count += 1;
        }
        debug!("incoming shot ({}, {}): {:?}", row, col, outcome);

        if outcome.is_hit() && self.hit_count >= self.ship_cells() {
            if self.config.defeat_report == DefeatReport::ReportFinalHit {
                out.push(DeviceMessage::ShotResult(ShotOutcome::Hit));
            }
            self.result = Some(GameResult::Lost);
            self.transition(SessionState::GameOver);
        } else {
            out.push(DeviceMessage::ShotResult(outcome));
            self.transition(SessionState::OffenseTurn);
        }
    }

    fn attack(&mut self, out: &mut Vec<DeviceMessage>) {
        match self.strategy.select_target(&self.tracking) {
            Some(coord) => {
                debug!("firing at ({}, {})", coord.0, coord.1);
                out.push(DeviceMessage::Shot(coord));
                self.pending_shot = Some(coord);
            }
            None => {
                warn!("no untried cells left; waiting without firing");
                self.pending_shot = None;
            }
        }
        self.transition(SessionState::AwaitingOwnShotResult);
    }

    fn finish_game(&mut self, out: &mut Vec<DeviceMessage>) {
        // Already reported: the tournament is over and the session idles.
        let Some(result) = self.result.take() else {
            return;
        };

        for row in 0..BOARD_SIZE {
            out.push(DeviceMessage::FieldRow(FieldRow::from_board(&self.original, row)));
        }
        self.games_played += 1;
        if result == GameResult::Won {
            self.games_won += 1;
        }
        info!(
            "game {} {:?} ({} won so far)",
            self.games_played, result, self.games_won
        );

        if self.games_played < self.config.effective_target_games() {
            self.new_generation();
        } else {
            info!(
                "played {} of {} games, idling",
                self.games_played,
                self.config.effective_target_games()
            );
        }
    }

    /// Re-place the fleet and clear per-game state. Cumulative counters are
    /// kept.
    fn new_generation(&mut self) {
        self.placement = self.own.initialize_with(&self.fleet);
        for ship in self.placement.skipped() {
            debug!("ship {:?} does not fit and was left out", ship);
        }
        self.original = self.own.clone();
        self.tracking.clear();
        self.hit_count = 0;
        self.pending_shot = None;
        self.result = None;
        self.transition(SessionState::WaitingStart);
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            debug!("{:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }

    /// Ship cells at game start: the defeat threshold.
    fn ship_cells(&self) -> usize {
        self.original.occupied_cells()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn own_board(&self) -> &Board {
        &self.own
    }

    /// The own board as it was when the current game started.
    pub fn original_board(&self) -> &Board {
        &self.original
    }

    pub fn tracking_board(&self) -> &TrackingBoard {
        &self.tracking
    }

    pub fn placement(&self) -> &PlacementReport {
        &self.placement
    }

    pub fn hit_count(&self) -> usize {
        self.hit_count
    }

    pub fn pending_shot(&self) -> Option<Coord> {
        self.pending_shot
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn games_won(&self) -> u32 {
        self.games_won
    }

    /// True once the target number of games has been played.
    pub fn is_finished(&self) -> bool {
        self.state == SessionState::GameOver
            && self.result.is_none()
            && self.games_played >= self.config.effective_target_games()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            games_played: self.games_played,
            games_won: self.games_won,
            target_games: self.config.effective_target_games(),
            state: self.state,
        }
    }
}
