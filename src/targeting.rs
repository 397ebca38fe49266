//! Shot selection against the tracking board.
//!
//! Every strategy picks exactly one untried cell per call and returns `None`
//! once the board has no untried cell left. Strategies read only the
//! tracking board's marks, so the deterministic ones carry no state of their
//! own.

use alloc::boxed::Box;

use rand::Rng;

use crate::board::TrackingBoard;
use crate::common::Coord;
use crate::config::BOARD_SIZE;

/// Chooses the next cell to fire at.
pub trait Targeting {
    fn select_target(&mut self, board: &TrackingBoard) -> Option<Coord>;
}

/// First untried cell in row-major order with even `row + col`.
pub fn first_even_parity(board: &TrackingBoard) -> Option<Coord> {
    board.untried().find(|&(r, c)| (r + c) % 2 == 0)
}

/// First untried cell in row-major order.
pub fn first_untried(board: &TrackingBoard) -> Option<Coord> {
    board.untried().next()
}

/// Canonical strategy: checkerboard parity first, then any untried cell.
#[derive(Debug, Default, Clone, Copy)]
pub struct Checkerboard;

impl Targeting for Checkerboard {
    fn select_target(&mut self, board: &TrackingBoard) -> Option<Coord> {
        first_even_parity(board).or_else(|| first_untried(board))
    }
}

/// Sweeps the border first (top row, bottom row, left column, right column),
/// then falls back to the checkerboard order.
#[derive(Debug, Default, Clone, Copy)]
pub struct PerimeterFirst;

impl Targeting for PerimeterFirst {
    fn select_target(&mut self, board: &TrackingBoard) -> Option<Coord> {
        let last = BOARD_SIZE - 1;
        let top = (0..BOARD_SIZE).map(|c| (0, c));
        let bottom = (0..BOARD_SIZE).map(move |c| (last, c));
        let left = (0..BOARD_SIZE).map(|r| (r, 0));
        let right = (0..BOARD_SIZE).map(move |r| (r, last));
        top.chain(bottom)
            .chain(left)
            .chain(right)
            .find(|&(r, c)| board.is_untried(r, c))
            .or_else(|| Checkerboard.select_target(board))
    }
}

/// Uniformly random untried cell.
pub struct RandomTargeting<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomTargeting<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Targeting for RandomTargeting<R> {
    fn select_target(&mut self, board: &TrackingBoard) -> Option<Coord> {
        let remaining = board.untried_count();
        if remaining == 0 {
            return None;
        }
        let pick = self.rng.random_range(0..remaining);
        board.untried().nth(pick)
    }
}

/// Deterministic strategies a device session can be configured with.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(clap::ValueEnum))]
pub enum StrategyKind {
    #[default]
    Checkerboard,
    PerimeterFirst,
}

impl StrategyKind {
    pub fn build(self) -> Box<dyn Targeting + Send> {
        match self {
            StrategyKind::Checkerboard => Box::new(Checkerboard),
            StrategyKind::PerimeterFirst => Box::new(PerimeterFirst),
        }
    }
}
