pub mod cell;
pub mod grid;
pub mod scan;

pub use cell::Cell;
pub use grid::{Grid, TileGrid};
pub use scan::{GridScanner, Position};
