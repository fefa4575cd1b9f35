//! Tile IO
//!
//! Save and load the foreign tiles, walls and fixtures of a tile world in a
//! compact side section next to the host's own world format. Content is stored by
//! `pack:name`, so saves survive packs being reordered, added or removed.

pub mod codec;
pub mod containers;
pub mod content;
pub mod error;
pub mod tiles;
pub mod world;

#[cfg(test)]
pub(crate) mod test_support;

pub use codec::{BinaryReader, BinaryWriter};
pub use containers::{read_containers, write_containers, ItemFrames, ItemSerializer};
pub use content::{ContentRef, ContentRegistry, EquipCategory, StaticRegistry, VanillaLimits};
pub use error::{Error, ErrorKind, Result};
pub use tiles::{read_tiles, write_tiles, LoadReport, PlaceholderRegistry, TypeDirectory};
pub use world::{Cell, Grid, Position, TileGrid};
