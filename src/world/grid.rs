use super::cell::Cell;
use super::scan::Position;

/// Cell storage the codec reads from and writes into.
///
/// Positions handed to the accessors are always inside `width` x `height`.
pub trait Grid {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn cell(&self, pos: Position) -> Cell;
    fn set_cell(&mut self, pos: Position, cell: Cell);

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }
}

/// Dense column-major grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl TileGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    fn index(&self, pos: Position) -> usize {
        pos.x as usize * self.height as usize + pos.y as usize
    }

    pub fn get(&self, x: u32, y: u32) -> &Cell {
        &self.cells[self.index(Position::new(x, y))]
    }

    pub fn get_mut(&mut self, x: u32, y: u32) -> &mut Cell {
        let idx = self.index(Position::new(x, y));
        &mut self.cells[idx]
    }

    pub fn set(&mut self, x: u32, y: u32, cell: Cell) {
        *self.get_mut(x, y) = cell;
    }

    /// Cells in scan order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }
}

impl Grid for TileGrid {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn cell(&self, pos: Position) -> Cell {
        self.cells[self.index(pos)]
    }

    fn set_cell(&mut self, pos: Position, cell: Cell) {
        let idx = self.index(pos);
        self.cells[idx] = cell;
    }
}
