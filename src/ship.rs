//! Ship definitions: an origin cell, a length and an orientation.

use crate::common::Coord;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A ship anchored at its origin. Horizontal ships extend towards higher
/// columns, vertical ships towards higher rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ship {
    row: usize,
    col: usize,
    length: u8,
    orientation: Orientation,
}

impl Ship {
    pub const fn new(row: usize, col: usize, length: u8, orientation: Orientation) -> Self {
        Self {
            row,
            col,
            length,
            orientation,
        }
    }

    pub const fn horizontal(row: usize, col: usize, length: u8) -> Self {
        Self::new(row, col, length, Orientation::Horizontal)
    }

    pub const fn vertical(row: usize, col: usize, length: u8) -> Self {
        Self::new(row, col, length, Orientation::Vertical)
    }

    /// Origin of the ship (row, col).
    pub fn origin(&self) -> Coord {
        (self.row, self.col)
    }

    pub fn length(&self) -> u8 {
        self.length
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Every cell the ship would cover, in order from the origin. Cells are
    /// not bounds checked.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.length as usize).map(move |i| match self.orientation {
            Orientation::Horizontal => (self.row, self.col + i),
            Orientation::Vertical => (self.row + i, self.col),
        })
    }
}
