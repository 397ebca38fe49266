//! Game boards: the own board holding ship truth and incoming damage, and the
//! tracking board recording our own shots against the opponent.

use alloc::vec::Vec;
use core::fmt;

use rand::Rng;

use crate::common::{in_bounds, BoardError, Coord, ShotOutcome};
use crate::config::{BOARD_SIZE, FLEET};
use crate::ship::{Orientation, Ship};

/// Attempts per ship before random placement gives up.
const MAX_PLACEMENT_ATTEMPTS: usize = 100;

/// Content of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Part of a ship, tagged with that ship's length.
    Ship(u8),
    Hit,
    Miss,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Digit used when the field is revealed: the ship length for ship
    /// cells, zero for everything else.
    pub fn reveal_digit(self) -> u8 {
        match self {
            Cell::Ship(len) => len,
            _ => 0,
        }
    }
}

pub type Grid = [[Cell; BOARD_SIZE]; BOARD_SIZE];

/// Per-row count of occupied cells, exchanged at game start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Checksum([u8; BOARD_SIZE]);

impl Checksum {
    pub fn from_counts(counts: [u8; BOARD_SIZE]) -> Self {
        Self(counts)
    }

    pub fn counts(&self) -> &[u8; BOARD_SIZE] {
        &self.0
    }

    /// Sum over all rows.
    pub fn total(&self) -> usize {
        self.0.iter().map(|&c| c as usize).sum()
    }
}

/// Which ships of a fleet actually made it onto the board. Ships that fail
/// the bounds or overlap check are skipped, never moved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlacementReport {
    outcomes: Vec<(Ship, bool)>,
}

impl PlacementReport {
    /// Ships in placement order together with their placed flag.
    pub fn outcomes(&self) -> &[(Ship, bool)] {
        &self.outcomes
    }

    pub fn placed(&self) -> impl Iterator<Item = &Ship> {
        self.outcomes.iter().filter(|(_, ok)| *ok).map(|(s, _)| s)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &Ship> {
        self.outcomes.iter().filter(|(_, ok)| !*ok).map(|(s, _)| s)
    }

    pub fn all_placed(&self) -> bool {
        self.outcomes.iter().all(|(_, ok)| *ok)
    }

    /// Number of cells covered by the placed ships.
    pub fn placed_cells(&self) -> usize {
        self.placed().map(|s| s.length() as usize).sum()
    }
}

/// The local player's board.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    grid: Grid,
}

impl Board {
    /// Create an empty board (no ships placed).
    pub fn new() -> Self {
        Self {
            grid: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Board holding the canonical fleet.
    pub fn canonical() -> Self {
        let mut board = Self::new();
        board.initialize();
        board
    }

    /// Clear the board and place the canonical fleet.
    pub fn initialize(&mut self) -> PlacementReport {
        self.initialize_with(&FLEET)
    }

    /// Clear the board and place `fleet` in order, skipping ships that do
    /// not fit.
    pub fn initialize_with(&mut self, fleet: &[Ship]) -> PlacementReport {
        self.clear();
        let outcomes = fleet
            .iter()
            .map(|ship| (*ship, self.place(ship).is_ok()))
            .collect();
        PlacementReport { outcomes }
    }

    pub fn clear(&mut self) {
        self.grid = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
    }

    /// Check that every cell of `ship` is on the grid and still empty.
    pub fn check_placement(&self, ship: &Ship) -> Result<(), BoardError> {
        for (r, c) in ship.cells() {
            if !in_bounds(r, c, BOARD_SIZE) {
                return Err(BoardError::ShipOutOfBounds);
            }
            if !self.grid[r][c].is_empty() {
                return Err(BoardError::ShipOverlaps);
            }
        }
        Ok(())
    }

    /// Place `ship`, tagging its cells with its length. Nothing is written
    /// when any cell fails the check.
    pub fn place(&mut self, ship: &Ship) -> Result<(), BoardError> {
        self.check_placement(ship)?;
        for (r, c) in ship.cells() {
            self.grid[r][c] = Cell::Ship(ship.length());
        }
        Ok(())
    }

    /// Returns a random non-overlapping ship of `length`.
    pub fn random_placement<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        length: u8,
    ) -> Result<Ship, BoardError> {
        let len = length as usize;
        if len == 0 || len > BOARD_SIZE {
            return Err(BoardError::ShipOutOfBounds);
        }
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let orient = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let (max_r, max_c) = match orient {
                Orientation::Horizontal => (BOARD_SIZE - 1, BOARD_SIZE - len),
                Orientation::Vertical => (BOARD_SIZE - len, BOARD_SIZE - 1),
            };
            let ship = Ship::new(
                rng.random_range(0..=max_r),
                rng.random_range(0..=max_c),
                length,
                orient,
            );
            if self.check_placement(&ship).is_ok() {
                return Ok(ship);
            }
        }
        Err(BoardError::UnableToPlaceShip)
    }

    /// Per-row count of non-empty cells.
    pub fn compute_row_checksum(&self) -> Checksum {
        let mut counts = [0u8; BOARD_SIZE];
        for (count, row) in counts.iter_mut().zip(self.grid.iter()) {
            *count = row.iter().filter(|c| !c.is_empty()).count() as u8;
        }
        Checksum(counts)
    }

    /// Resolve a shot from the peer. Ship cells become [`Cell::Hit`]; every
    /// other cell is left untouched and reported as a miss.
    ///
    /// The coordinate must already be validated; out-of-range input panics.
    pub fn apply_incoming_shot(&mut self, row: usize, col: usize) -> ShotOutcome {
        let cell = &mut self.grid[row][col];
        match *cell {
            Cell::Ship(_) => {
                *cell = Cell::Hit;
                ShotOutcome::Hit
            }
            _ => ShotOutcome::Miss,
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.grid.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cells that hold a ship, hit or not.
    pub fn occupied_cells(&self) -> usize {
        self.grid
            .iter()
            .flatten()
            .filter(|c| matches!(c, Cell::Ship(_) | Cell::Hit))
            .count()
    }

    /// Ship cells not yet hit.
    pub fn remaining_ship_cells(&self) -> usize {
        self.grid
            .iter()
            .flatten()
            .filter(|c| matches!(c, Cell::Ship(_)))
            .count()
    }

    /// Reveal digits of one row.
    pub fn row_digits(&self, row: usize) -> [u8; BOARD_SIZE] {
        let mut digits = [0u8; BOARD_SIZE];
        for (d, cell) in digits.iter_mut().zip(self.grid[row].iter()) {
            *d = cell.reveal_digit();
        }
        digits
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

fn render(grid: &Grid, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for row in grid.iter() {
        for cell in row.iter() {
            let ch = match cell {
                Cell::Empty => '.',
                Cell::Ship(len) => char::from_digit(*len as u32, 36).unwrap_or('#'),
                Cell::Hit => 'X',
                Cell::Miss => 'o',
            };
            write!(f, "{}", ch)?;
        }
        writeln!(f)?;
    }
    Ok(())
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(&self.grid, f)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{")?;
        render(&self.grid, f)?;
        write!(f, "}}")
    }
}

/// Outcomes of our own shots against the opponent. Cells are untried
/// ([`Cell::Empty`]), [`Cell::Hit`] or [`Cell::Miss`]; the opponent's ship
/// identity is never known.
#[derive(Clone, PartialEq, Eq)]
pub struct TrackingBoard {
    grid: Grid,
}

impl TrackingBoard {
    pub fn new() -> Self {
        Self {
            grid: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    pub fn clear(&mut self) {
        self.grid = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
    }

    pub fn is_untried(&self, row: usize, col: usize) -> bool {
        matches!(self.cell(row, col), Some(Cell::Empty))
    }

    /// Record the outcome of a shot at `coord`. Out-of-range coordinates are
    /// ignored.
    pub fn mark(&mut self, (row, col): Coord, outcome: ShotOutcome) {
        if let Some(cell) = self.grid.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = match outcome {
                ShotOutcome::Hit => Cell::Hit,
                ShotOutcome::Miss => Cell::Miss,
            };
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.grid.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Untried cells in row-major order.
    pub fn untried(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..BOARD_SIZE)
            .flat_map(|r| (0..BOARD_SIZE).map(move |c| (r, c)))
            .filter(move |&(r, c)| self.grid[r][c].is_empty())
    }

    pub fn untried_count(&self) -> usize {
        self.untried().count()
    }

    pub fn hits(&self) -> usize {
        self.grid
            .iter()
            .flatten()
            .filter(|c| matches!(c, Cell::Hit))
            .count()
    }
}

impl Default for TrackingBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TrackingBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TrackingBoard {{")?;
        render(&self.grid, f)?;
        write!(f, "}}")
    }
}
