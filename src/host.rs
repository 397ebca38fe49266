//! Host side of the protocol.
//!
//! [`HostPeer`] plays the tournament host against a device session: it opens
//! each game, fires first with random targeting from a randomly placed fleet,
//! and checks the device's start-of-game checksum against the field the
//! device reveals when the game ends.

use alloc::vec::Vec;

use log::{debug, info, trace, warn};
use rand::{Rng, SeedableRng};

use crate::board::{Board, Checksum, TrackingBoard};
use crate::common::Coord;
use crate::config::{BOARD_SIZE, FLEET_LENGTHS};
use crate::protocol::{DeviceMessage, FieldRow, HostMessage};
use crate::targeting::{RandomTargeting, Targeting};

/// Random layouts tried before falling back to the canonical fleet.
const LAYOUT_ATTEMPTS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostState {
    Idle,
    AwaitStartAck,
    AwaitChecksum,
    AwaitShotResult,
    AwaitDeviceShot,
    AwaitReveal,
    Done,
}

/// Tournament totals as seen by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct HostStats {
    pub games: u32,
    pub host_wins: u32,
    pub device_wins: u32,
    /// Games whose revealed field disagreed with the device's checksum.
    pub checksum_mismatches: u32,
}

pub struct HostPeer<R: Rng> {
    rng: R,
    targeting: RandomTargeting<R>,
    state: HostState,
    board: Board,
    original: Board,
    tracking: TrackingBoard,
    hits_taken: usize,
    pending_shot: Option<Coord>,
    device_checksum: Option<Checksum>,
    revealed: [Option<FieldRow>; BOARD_SIZE],
    target_games: u32,
    stats: HostStats,
}

impl<R: Rng + SeedableRng> HostPeer<R> {
    pub fn new(mut rng: R, target_games: u32) -> Self {
        let targeting = RandomTargeting::new(R::from_rng(&mut rng));
        Self {
            rng,
            targeting,
            state: HostState::Idle,
            board: Board::new(),
            original: Board::new(),
            tracking: TrackingBoard::new(),
            hits_taken: 0,
            pending_shot: None,
            device_checksum: None,
            revealed: [None; BOARD_SIZE],
            target_games: target_games.max(1),
            stats: HostStats::default(),
        }
    }
}

impl<R: Rng> HostPeer<R> {
    /// Run one tick with the device line received during it, if any.
    pub fn step(&mut self, line: Option<&str>) -> Vec<HostMessage> {
        let mut out = Vec::new();
        let msg = line.and_then(|l| match DeviceMessage::parse(l) {
            Ok(msg) => Some(msg),
            Err(e) => {
                trace!("host discarding {:?}: {}", l, e);
                None
            }
        });

        match (self.state, msg) {
            (HostState::Idle, _) => {
                self.new_game();
                out.push(HostMessage::Start);
                self.state = HostState::AwaitStartAck;
            }
            (HostState::AwaitStartAck, Some(DeviceMessage::StartAck(name))) => {
                debug!("device {:?} joined", name);
                out.push(HostMessage::ChecksumRequest {
                    host: Some(self.board.compute_row_checksum()),
                });
                self.state = HostState::AwaitChecksum;
            }
            (HostState::AwaitChecksum, Some(DeviceMessage::Checksum(cs))) => {
                self.device_checksum = Some(cs);
                self.fire(&mut out);
            }
            (HostState::AwaitShotResult, Some(DeviceMessage::ShotResult(outcome))) => {
                if let Some(coord) = self.pending_shot.take() {
                    self.tracking.mark(coord, outcome);
                }
                self.state = HostState::AwaitDeviceShot;
            }
            (
                HostState::AwaitShotResult | HostState::AwaitDeviceShot,
                Some(DeviceMessage::FieldRow(row)),
            ) => {
                self.stats.host_wins += 1;
                self.state = HostState::AwaitReveal;
                self.record_reveal(row);
            }
            (HostState::AwaitDeviceShot, Some(DeviceMessage::Shot((row, col)))) => {
                let outcome = self.board.apply_incoming_shot(row, col);
                if outcome.is_hit() {
                    self.hits_taken += 1;
                }
                if outcome.is_hit() && self.hits_taken >= self.original.occupied_cells() {
                    self.stats.device_wins += 1;
                    for r in 0..BOARD_SIZE {
                        let reveal = FieldRow::from_board(&self.original, r);
                        out.push(HostMessage::FieldReveal(Some(reveal)));
                    }
                    self.state = HostState::AwaitReveal;
                } else {
                    out.push(HostMessage::ShotResult(outcome));
                    self.fire(&mut out);
                }
            }
            (HostState::AwaitReveal, Some(DeviceMessage::FieldRow(row))) => {
                self.record_reveal(row);
            }
            _ => {}
        }
        out
    }

    fn new_game(&mut self) {
        let layout = (0..LAYOUT_ATTEMPTS).find_map(|_| self.random_layout());
        self.board = layout.unwrap_or_else(|| {
            warn!("no usable random host layout, using the canonical fleet");
            Board::canonical()
        });
        self.original = self.board.clone();
        self.tracking.clear();
        self.hits_taken = 0;
        self.pending_shot = None;
        self.device_checksum = None;
        self.revealed = [None; BOARD_SIZE];
    }

    /// A random layout whose checksum fits the single-digit wire fields.
    fn random_layout(&mut self) -> Option<Board> {
        let mut board = Board::new();
        for &len in FLEET_LENGTHS.iter() {
            let ship = match board.random_placement(&mut self.rng, len) {
                Ok(ship) => ship,
                Err(e) => {
                    debug!("host layout attempt failed: {}", e);
                    return None;
                }
            };
            board.place(&ship).ok()?;
        }
        let fits = board.compute_row_checksum().counts().iter().all(|&n| n <= 9);
        fits.then_some(board)
    }

    fn fire(&mut self, out: &mut Vec<HostMessage>) {
        match self.targeting.select_target(&self.tracking) {
            Some(coord) => {
                out.push(HostMessage::Shot(coord));
                self.pending_shot = Some(coord);
            }
            None => warn!("host has no untried cells left"),
        }
        self.state = HostState::AwaitShotResult;
    }

    fn record_reveal(&mut self, row: FieldRow) {
        self.revealed[row.row] = Some(row);
        if self.revealed.iter().any(Option::is_none) {
            return;
        }

        let agrees = match self.device_checksum {
            Some(cs) => self
                .revealed
                .iter()
                .flatten()
                .all(|r| r.occupied() == cs.counts()[r.row] as usize),
            None => false,
        };
        if !agrees {
            warn!("revealed field does not match the device checksum");
            self.stats.checksum_mismatches += 1;
        }

        self.stats.games += 1;
        info!(
            "host finished game {} (host {} / device {})",
            self.stats.games, self.stats.host_wins, self.stats.device_wins
        );
        self.state = if self.stats.games < self.target_games {
            HostState::Idle
        } else {
            HostState::Done
        };
    }

    pub fn is_done(&self) -> bool {
        self.state == HostState::Done
    }

    pub fn stats(&self) -> HostStats {
        self.stats
    }

    pub fn board(&self) -> &Board {
        &self.board
    }
}
