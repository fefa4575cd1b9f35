//! Canonical traversal shared by the writer and the reader.
//!
//! The body stream carries no positions and no resync markers, so both sides must
//! walk cells in exactly this order and agree on which cells carry foreign data.

use std::fmt;

use super::cell::Cell;
use crate::content::VanillaLimits;

/// Grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Column-major walk: `y` wraps first, then `x` moves on
#[derive(Debug, Clone, Copy)]
pub struct GridScanner {
    width: u32,
    height: u32,
    limits: VanillaLimits,
}

impl GridScanner {
    pub fn new(width: u32, height: u32, limits: VanillaLimits) -> Self {
        Self { width, height, limits }
    }

    pub fn limits(&self) -> &VanillaLimits {
        &self.limits
    }

    pub fn cell_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn first(&self) -> Option<Position> {
        (self.width > 0 && self.height > 0).then_some(Position::new(0, 0))
    }

    /// The position after `pos`, or `None` when `pos` is the last cell
    pub fn advance(&self, pos: Position) -> Option<Position> {
        if pos.y + 1 < self.height {
            return Some(Position::new(pos.x, pos.y + 1));
        }
        if pos.x + 1 < self.width {
            return Some(Position::new(pos.x + 1, 0));
        }
        None
    }

    /// Advance `n` times, or `None` if the walk leaves the grid on the way
    pub fn skip(&self, mut pos: Position, n: u8) -> Option<Position> {
        for _ in 0..n {
            pos = self.advance(pos)?;
        }
        Some(pos)
    }

    pub fn has_foreign_data(&self, cell: &Cell) -> bool {
        (cell.active && self.limits.is_foreign_tile(cell.tile_type))
            || self.limits.is_foreign_wall(cell.wall)
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        std::iter::successors(self.first(), move |&p| self.advance(p))
    }
}
