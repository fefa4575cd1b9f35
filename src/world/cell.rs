/// A single grid cell: one tile layer and one wall layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub active: bool,
    pub tile_type: u16,
    pub frame_x: i16,
    pub frame_y: i16,
    pub wall: u16,
    pub color: u8,
    pub wall_color: u8,
}

impl Cell {
    /// An active tile with the given type and frame
    pub fn tile(tile_type: u16, frame_x: i16, frame_y: i16) -> Self {
        Self {
            active: true,
            tile_type,
            frame_x,
            frame_y,
            ..Self::default()
        }
    }

    /// An empty cell with only a wall
    pub fn wall(wall: u16) -> Self {
        Self { wall, ..Self::default() }
    }

    pub fn with_wall(mut self, wall: u16) -> Self {
        self.wall = wall;
        self
    }

    pub fn with_color(mut self, color: u8) -> Self {
        self.color = color;
        self
    }

    pub fn with_wall_color(mut self, wall_color: u8) -> Self {
        self.wall_color = wall_color;
        self
    }

    /// Whether `other` can be folded into a run started by `self`.
    ///
    /// Tile type only matters for active cells, and frames only when
    /// `frame_important` holds for that type.
    pub fn same_as(&self, other: &Cell, frame_important: bool) -> bool {
        if self.active != other.active
            || self.color != other.color
            || self.wall != other.wall
            || self.wall_color != other.wall_color
        {
            return false;
        }
        if !self.active {
            return true;
        }
        self.tile_type == other.tile_type
            && (!frame_important
                || (self.frame_x == other.frame_x && self.frame_y == other.frame_y))
    }
}
