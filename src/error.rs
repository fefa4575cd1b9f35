use crate::containers::EquipCategory;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unexpected end of data")]
    UnexpectedEof,

    #[error("string too long: {len} bytes (max {max})")]
    StringTooLong { len: usize, max: usize },

    #[error("invalid string: {0}")]
    InvalidString(String),

    #[error("record references tile id {0} missing from the type directory")]
    UnknownSavedTile(u16),

    #[error("record references wall id {0} missing from the type directory")]
    UnknownSavedWall(u16),

    #[error("{category:?} slot {slot} missing from the equip directory")]
    UnknownSavedSlot { category: EquipCategory, slot: u16 },

    #[error("invalid equip category: {0}")]
    InvalidEquipCategory(u8),

    #[error("run of {count} cells starting at ({x}, {y}) overruns the grid")]
    RunPastEnd { x: u32, y: u32, count: u8 },

    #[error("record at ({x}, {y}) chains past the last cell")]
    ChainPastEnd { x: u32, y: u32 },

    #[error("position ({x}, {y}) is outside the grid")]
    PositionOutOfBounds { x: i32, y: i32 },

    #[error("negative entry count: {0}")]
    NegativeCount(i32),

    #[error("no item frame with id {0}")]
    MissingFixture(i32),

    #[error("foreign tile type {0} has no registered content")]
    UnregisteredTile(u16),

    #[error("foreign wall type {0} has no registered content")]
    UnregisteredWall(u16),

    #[error("foreign {category:?} slot {slot} has no registered content")]
    UnregisteredEquip { category: EquipCategory, slot: u16 },

    #[error("no free tile ids left for placeholder entries")]
    PlaceholderIdsExhausted,
}

/// Broad class of an [`Error`], for callers deciding how to report a failed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The stream is truncated or names something its own directory lacks.
    Format,
    /// The stream is well formed but disagrees with the grid it is applied to.
    Invariant,
    /// The grid cannot be described with the current registry.
    Write,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnexpectedEof
            | Self::StringTooLong { .. }
            | Self::InvalidString(_)
            | Self::UnknownSavedTile(_)
            | Self::UnknownSavedWall(_)
            | Self::UnknownSavedSlot { .. }
            | Self::InvalidEquipCategory(_)
            | Self::NegativeCount(_) => ErrorKind::Format,
            Self::RunPastEnd { .. }
            | Self::ChainPastEnd { .. }
            | Self::PositionOutOfBounds { .. }
            | Self::MissingFixture(_) => ErrorKind::Invariant,
            Self::UnregisteredTile(_)
            | Self::UnregisteredWall(_)
            | Self::UnregisteredEquip { .. }
            | Self::PlaceholderIdsExhausted => ErrorKind::Write,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
