use alloc::string::{String, ToString};

use crate::session::DefeatReport;
use crate::ship::Ship;
use crate::targeting::StrategyKind;

pub const BOARD_SIZE: usize = 10;
pub const NUM_SHIPS: usize = 10;

/// Canonical fleet in placement order: one length-5, two length-4, three
/// length-3 and four length-2 ships at the device's fixed positions.
pub const FLEET: [Ship; NUM_SHIPS] = [
    Ship::horizontal(0, 0, 5),
    Ship::vertical(2, 0, 4),
    Ship::vertical(1, 9, 4),
    Ship::horizontal(5, 3, 3),
    Ship::vertical(2, 7, 3),
    Ship::horizontal(7, 5, 3),
    Ship::horizontal(0, 6, 2),
    Ship::vertical(7, 0, 2),
    Ship::vertical(6, 9, 2),
    Ship::horizontal(9, 5, 2),
];

/// Ship lengths of the canonical fleet, for layouts that only share the
/// fleet composition (the simulated host places these randomly).
pub const FLEET_LENGTHS: [u8; NUM_SHIPS] = [5, 4, 4, 3, 3, 3, 2, 2, 2, 2];

/// Total number of ship segments in the canonical fleet.
pub const TOTAL_SHIP_CELLS: usize = 5 + 4 + 4 + 3 + 3 + 3 + 2 + 2 + 2 + 2;

pub const DEFAULT_DEVICE_NAME: &str = "LEO";
pub const DEFAULT_TARGET_GAMES: u32 = 100;

/// Longest line the receive side keeps; extra bytes are dropped.
pub const MAX_LINE_LEN: usize = 31;

/// Runtime parameters of a device session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Sent verbatim in the start acknowledgement.
    pub device_name: String,
    /// Number of games after which the session stays in its terminal state.
    pub target_games: u32,
    pub defeat_report: DefeatReport,
    pub strategy: StrategyKind,
}

impl SessionConfig {
    pub fn new(device_name: impl Into<String>, target_games: u32) -> Self {
        Self {
            device_name: device_name.into(),
            target_games,
            ..Self::default()
        }
    }

    /// Target games, never less than one.
    pub fn effective_target_games(&self) -> u32 {
        self.target_games.max(1)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            device_name: DEFAULT_DEVICE_NAME.to_string(),
            target_games: DEFAULT_TARGET_GAMES,
            defeat_report: DefeatReport::default(),
            strategy: StrategyKind::default(),
        }
    }
}
