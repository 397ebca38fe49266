//! Common types shared by the board, the codec and the session: coordinates,
//! shot outcomes and board errors.

/// A `(row, col)` position on the board.
pub type Coord = (usize, usize);

/// Result of resolving a single shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    /// The shot struck an unresolved ship cell.
    Hit,
    /// The shot struck water or an already resolved cell.
    Miss,
}

impl ShotOutcome {
    pub fn is_hit(self) -> bool {
        matches!(self, ShotOutcome::Hit)
    }
}

/// Errors returned by board placement operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// At least one cell of the ship lies outside the grid.
    ShipOutOfBounds,
    /// At least one cell of the ship is already occupied.
    ShipOverlaps,
    /// Random placement gave up after exhausting its attempts.
    UnableToPlaceShip,
}

impl core::fmt::Display for BoardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoardError::ShipOutOfBounds => write!(f, "Ship placement is out of bounds"),
            BoardError::ShipOverlaps => write!(f, "Ship placement overlaps with another ship"),
            BoardError::UnableToPlaceShip => write!(f, "Unable to place ship"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}

/// True when `(row, col)` lies on an `n`×`n` grid.
#[inline]
pub fn in_bounds(row: usize, col: usize, n: usize) -> bool {
    row < n && col < n
}
