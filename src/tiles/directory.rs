//! Type directory: the header naming every foreign tile and wall id used in the body.
//!
//! # Layout
//!
//! ```text
//! u16 tile_count
//!   tile_count x (u16 saved_id, string pack, string name, bool frame_important)
//! u16 wall_count
//!   wall_count x (u16 saved_id, string pack, string name)
//! ```
//!
//! Entries are written sorted by saved id.

use std::collections::BTreeSet;

use ahash::AHashMap;
use indexmap::IndexSet;

use super::placeholder::{PlaceholderIdentity, PlaceholderRegistry};
use crate::codec::{BinaryReader, BinaryWriter};
use crate::content::{ContentRef, ContentRegistry};
use crate::error::{Error, Result};
use crate::world::{Cell, Grid, GridScanner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileEntry {
    pub saved_id: u16,
    pub content: ContentRef,
    pub frame_important: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallEntry {
    pub saved_id: u16,
    pub content: ContentRef,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDirectory {
    pub tiles: Vec<TileEntry>,
    pub walls: Vec<WallEntry>,
}

impl TypeDirectory {
    /// Scan `grid` and name every foreign tile and wall in it.
    ///
    /// Placeholder cells are listed under the identity they stand for, using saved
    /// ids taken from the top of the id space. The returned [`SaveTable`] maps cells
    /// to the ids and frames the body must use.
    pub fn collect<'a, G: Grid, R: ContentRegistry>(
        grid: &G,
        registry: &'a R,
        placeholders: &'a PlaceholderRegistry,
    ) -> Result<(Self, SaveTable<'a, R>)> {
        let limits = *registry.limits();
        let scanner = GridScanner::new(grid.width(), grid.height(), limits);
        let mut table = SaveTable {
            registry,
            placeholders,
            placeholder_ids: AHashMap::new(),
        };

        let mut tile_types = BTreeSet::new();
        let mut wall_types = BTreeSet::new();
        let mut missing: IndexSet<(ContentRef, bool)> = IndexSet::new();
        let mut orphaned = 0usize;

        for pos in scanner.positions() {
            let cell = grid.cell(pos);
            if cell.active && limits.is_foreign_tile(cell.tile_type) {
                match table.placeholder_identity(&cell) {
                    Some(identity) => {
                        missing.insert((identity.content.clone(), identity.frame_important()));
                    }
                    None => {
                        if cell.tile_type == registry.placeholder_tile() {
                            orphaned += 1;
                        }
                        tile_types.insert(cell.tile_type);
                    }
                }
            }
            if limits.is_foreign_wall(cell.wall) {
                wall_types.insert(cell.wall);
            }
        }

        if orphaned > 0 {
            tracing::warn!(
                cells = orphaned,
                "placeholder cells with unknown ids saved as plain placeholder tiles"
            );
        }

        let mut tiles = Vec::with_capacity(tile_types.len() + missing.len());
        for &tile_type in &tile_types {
            let content = registry
                .tile_content(tile_type)
                .ok_or(Error::UnregisteredTile(tile_type))?;
            tiles.push(TileEntry {
                saved_id: tile_type,
                content,
                frame_important: registry.tile_frame_important(tile_type),
            });
        }

        let mut free_ids = (0..=u16::MAX).rev().filter(|id| !tile_types.contains(id));
        for (content, frame_important) in missing {
            let saved_id = free_ids.next().ok_or(Error::PlaceholderIdsExhausted)?;
            table
                .placeholder_ids
                .insert((content.clone(), frame_important), saved_id);
            tiles.push(TileEntry {
                saved_id,
                content,
                frame_important,
            });
        }
        tiles.sort_by_key(|entry| entry.saved_id);

        let walls = wall_types
            .into_iter()
            .map(|wall| {
                let content = registry.wall_content(wall).ok_or(Error::UnregisteredWall(wall))?;
                Ok(WallEntry { saved_id: wall, content })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((Self { tiles, walls }, table))
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty() && self.walls.is_empty()
    }

    pub fn tile(&self, saved_id: u16) -> Option<&TileEntry> {
        self.tiles.iter().find(|entry| entry.saved_id == saved_id)
    }

    pub fn write(&self, writer: &mut BinaryWriter) {
        writer.write_u16_le(self.tiles.len() as u16);
        for entry in &self.tiles {
            writer.write_u16_le(entry.saved_id);
            writer.write_string(&entry.content.pack);
            writer.write_string(&entry.content.name);
            writer.write_bool(entry.frame_important);
        }
        writer.write_u16_le(self.walls.len() as u16);
        for entry in &self.walls {
            writer.write_u16_le(entry.saved_id);
            writer.write_string(&entry.content.pack);
            writer.write_string(&entry.content.name);
        }
    }

    pub fn read(reader: &mut BinaryReader) -> Result<Self> {
        let count = reader.read_u16_le()?;
        let mut tiles = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let saved_id = reader.read_u16_le()?;
            let pack = reader.read_string()?;
            let name = reader.read_string()?;
            let frame_important = reader.read_bool()?;
            tiles.push(TileEntry {
                saved_id,
                content: ContentRef { pack, name },
                frame_important,
            });
        }

        let count = reader.read_u16_le()?;
        let mut walls = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let saved_id = reader.read_u16_le()?;
            let pack = reader.read_string()?;
            let name = reader.read_string()?;
            walls.push(WallEntry {
                saved_id,
                content: ContentRef { pack, name },
            });
        }

        Ok(Self { tiles, walls })
    }
}

/// Saved form of a cell's tile layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedTile {
    pub id: u16,
    /// Frame to write, present when the saved entry is frame-important
    pub frame: Option<(i16, i16)>,
}

/// Write-side mapping from runtime cells to directory ids
pub struct SaveTable<'a, R> {
    registry: &'a R,
    placeholders: &'a PlaceholderRegistry,
    placeholder_ids: AHashMap<(ContentRef, bool), u16>,
}

impl<'a, R: ContentRegistry> SaveTable<'a, R> {
    pub fn registry(&self) -> &'a R {
        self.registry
    }

    fn placeholder_identity(&self, cell: &Cell) -> Option<&'a PlaceholderIdentity> {
        if cell.tile_type != self.registry.placeholder_tile() {
            return None;
        }
        self.placeholders.identity_at(cell.frame_x, cell.frame_y)
    }

    /// Frame importance used when comparing cells for a run
    pub fn run_frame_important(&self, tile_type: u16) -> bool {
        tile_type == self.registry.placeholder_tile()
            || self.registry.tile_frame_important(tile_type)
    }

    pub fn saved_tile(&self, cell: &Cell) -> SavedTile {
        if let Some(identity) = self.placeholder_identity(cell) {
            let key = (identity.content.clone(), identity.frame_important());
            if let Some(&id) = self.placeholder_ids.get(&key) {
                return SavedTile {
                    id,
                    frame: identity.frame,
                };
            }
        }
        SavedTile {
            id: cell.tile_type,
            frame: self
                .registry
                .tile_frame_important(cell.tile_type)
                .then_some((cell.frame_x, cell.frame_y)),
        }
    }
}

#[derive(Debug, Clone)]
struct TileRemap {
    runtime: u16,
    frame_important: bool,
    unresolved: Option<ContentRef>,
}

/// Read-side mapping from saved ids to runtime ids
#[derive(Debug, Clone, Default)]
pub struct RemapTable {
    tiles: AHashMap<u16, TileRemap>,
    walls: AHashMap<u16, u16>,
    unresolved_walls: usize,
}

impl RemapTable {
    /// Resolve every directory entry against the loaded content.
    ///
    /// Missing tiles map to the placeholder type and keep their identity for
    /// [`PlaceholderRegistry::resolve`]. Missing walls collapse to `0`.
    pub fn resolve<R: ContentRegistry>(directory: &TypeDirectory, registry: &R) -> Self {
        let mut table = Self::default();

        for entry in &directory.tiles {
            let remap = match registry.resolve_tile(&entry.content) {
                Some(runtime) => TileRemap {
                    runtime,
                    frame_important: entry.frame_important,
                    unresolved: None,
                },
                None => {
                    tracing::debug!(saved_id = entry.saved_id, content = %entry.content, "tile not loaded");
                    TileRemap {
                        runtime: registry.placeholder_tile(),
                        frame_important: entry.frame_important,
                        unresolved: Some(entry.content.clone()),
                    }
                }
            };
            table.tiles.insert(entry.saved_id, remap);
        }

        for entry in &directory.walls {
            let runtime = registry.resolve_wall(&entry.content).unwrap_or_else(|| {
                tracing::warn!(saved_id = entry.saved_id, content = %entry.content, "wall not loaded, removing");
                table.unresolved_walls += 1;
                0
            });
            table.walls.insert(entry.saved_id, runtime);
        }

        table
    }

    pub fn tile(&self, saved_id: u16) -> Result<u16> {
        self.tiles
            .get(&saved_id)
            .map(|remap| remap.runtime)
            .ok_or(Error::UnknownSavedTile(saved_id))
    }

    pub fn wall(&self, saved_id: u16) -> Result<u16> {
        self.walls
            .get(&saved_id)
            .copied()
            .ok_or(Error::UnknownSavedWall(saved_id))
    }

    pub fn frame_important(&self, saved_id: u16) -> bool {
        self.tiles
            .get(&saved_id)
            .is_some_and(|remap| remap.frame_important)
    }

    pub fn unresolved(&self, saved_id: u16) -> Option<&ContentRef> {
        self.tiles.get(&saved_id)?.unresolved.as_ref()
    }

    pub fn unresolved_tiles(&self) -> usize {
        self.tiles.values().filter(|remap| remap.unresolved.is_some()).count()
    }

    pub fn unresolved_walls(&self) -> usize {
        self.unresolved_walls
    }
}
