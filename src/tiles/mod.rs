//! Foreign tile and wall section of a world save.
//!
//! ```text
//! Section := (absent) | TypeDirectory Body
//! ```
//!
//! The section is absent when the grid holds no foreign tiles or walls. The caller
//! records that in its own container format.

pub mod body;
pub mod directory;
pub mod placeholder;
pub mod record;

pub use directory::{RemapTable, TileEntry, TypeDirectory, WallEntry};
pub use placeholder::{PlaceholderFrame, PlaceholderIdentity, PlaceholderRegistry};
pub use record::{DecodeStats, RecordFlags};

use crate::codec::{BinaryReader, BinaryWriter};
use crate::content::ContentRegistry;
use crate::error::Result;
use crate::world::{Grid, GridScanner};

/// Summary of one [`read_tiles`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub tile_entries: usize,
    pub wall_entries: usize,
    pub unresolved_tiles: usize,
    pub unresolved_walls: usize,
    pub records: usize,
    pub cells: u64,
    pub placeholder_cells: u64,
    /// Identities added to the placeholder registry by this load
    pub new_placeholders: usize,
}

/// Encode the foreign data of `grid`, or `None` if there is none
pub fn write_tiles<G: Grid, R: ContentRegistry>(
    grid: &G,
    registry: &R,
    placeholders: &PlaceholderRegistry,
) -> Result<Option<Vec<u8>>> {
    let (directory, table) = TypeDirectory::collect(grid, registry, placeholders)?;
    if directory.is_empty() {
        tracing::debug!("no foreign tiles or walls, section omitted");
        return Ok(None);
    }

    let mut writer = BinaryWriter::new();
    directory.write(&mut writer);
    let directory_len = writer.len();
    body::write_body(&mut writer, grid, &table);

    tracing::debug!(
        tiles = directory.tiles.len(),
        walls = directory.walls.len(),
        directory_bytes = directory_len,
        body_bytes = writer.len() - directory_len,
        "tile section written"
    );
    Ok(Some(writer.into_vec()))
}

/// Decode a section written by [`write_tiles`] into `grid`.
///
/// `grid` must have the dimensions of the saved world. Tiles whose content is not
/// loaded become placeholders registered in `placeholders`. Any error leaves `grid`
/// partially written; the caller should discard the world.
pub fn read_tiles<G: Grid, R: ContentRegistry>(
    reader: &mut BinaryReader,
    grid: &mut G,
    registry: &R,
    placeholders: &mut PlaceholderRegistry,
) -> Result<LoadReport> {
    let directory = TypeDirectory::read(reader)?;
    let remap = RemapTable::resolve(&directory, registry);
    let scanner = GridScanner::new(grid.width(), grid.height(), *registry.limits());

    let known = placeholders.len();
    let stats = body::read_body(reader, grid, &scanner, &remap, placeholders)?;

    let report = LoadReport {
        tile_entries: directory.tiles.len(),
        wall_entries: directory.walls.len(),
        unresolved_tiles: remap.unresolved_tiles(),
        unresolved_walls: remap.unresolved_walls(),
        records: stats.records,
        cells: stats.cells,
        placeholder_cells: stats.placeholder_cells,
        new_placeholders: placeholders.len() - known,
    };
    tracing::info!(
        records = report.records,
        cells = report.cells,
        placeholders = report.new_placeholders,
        "tile section loaded"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentRef, StaticRegistry};
    use crate::error::{Error, ErrorKind};
    use crate::test_support::{bare_registry, foo_registry, reordered_registry, sample_grid, vanilla_layer};
    use crate::world::{Cell, TileGrid};

    fn save(grid: &TileGrid, registry: &StaticRegistry, placeholders: &PlaceholderRegistry) -> Vec<u8> {
        write_tiles(grid, registry, placeholders).unwrap().unwrap()
    }

    /// Load `bytes` on top of the built-in layer of `source`
    fn load(
        bytes: &[u8],
        source: &TileGrid,
        registry: &StaticRegistry,
        placeholders: &mut PlaceholderRegistry,
    ) -> (TileGrid, LoadReport) {
        let mut grid = vanilla_layer(source, registry);
        let mut reader = BinaryReader::new(bytes);
        let report = read_tiles(&mut reader, &mut grid, registry, placeholders).unwrap();
        assert!(reader.is_empty());
        (grid, report)
    }

    #[test]
    fn test_vanilla_grid_is_absent() {
        let registry = foo_registry();
        let mut grid = TileGrid::new(20, 20);
        grid.set(3, 4, Cell::tile(5, 18, 0).with_wall(12).with_color(2));

        assert_eq!(write_tiles(&grid, &registry, &PlaceholderRegistry::new()).unwrap(), None);
        assert_eq!(write_tiles(&TileGrid::new(0, 0), &registry, &PlaceholderRegistry::new()).unwrap(), None);
    }

    #[test]
    fn test_roundtrip() {
        let registry = foo_registry();
        let grid = sample_grid(&registry);
        let bytes = save(&grid, &registry, &PlaceholderRegistry::new());

        let mut placeholders = PlaceholderRegistry::new();
        let (loaded, report) = load(&bytes, &grid, &registry, &mut placeholders);
        assert_eq!(loaded, grid);
        assert_eq!(report.unresolved_tiles, 0);
        assert!(placeholders.is_empty());
    }

    #[test]
    fn test_roundtrip_with_reordered_ids() {
        let registry = foo_registry();
        let grid = sample_grid(&registry);
        let bytes = save(&grid, &registry, &PlaceholderRegistry::new());

        let other = reordered_registry();
        let (loaded, _) = load(&bytes, &grid, &other, &mut PlaceholderRegistry::new());

        for (before, after) in grid.cells().iter().zip(loaded.cells()) {
            if before.active && before.tile_type >= registry.limits().tile_count {
                assert_eq!(
                    registry.tile_content(before.tile_type),
                    other.tile_content(after.tile_type)
                );
            } else {
                assert_eq!(before.tile_type, after.tile_type);
            }
            if before.wall >= registry.limits().wall_count {
                assert_eq!(registry.wall_content(before.wall), other.wall_content(after.wall));
            }
            assert_eq!((before.frame_x, before.frame_y), (after.frame_x, after.frame_y));
        }
    }

    #[test]
    fn test_missing_pack_placeholders_are_deterministic() {
        let registry = foo_registry();
        let grid = sample_grid(&registry);
        let bytes = save(&grid, &registry, &PlaceholderRegistry::new());
        let bare = bare_registry();

        let mut first = PlaceholderRegistry::new();
        let (a, report) = load(&bytes, &grid, &bare, &mut first);
        let mut second = PlaceholderRegistry::new();
        let (b, _) = load(&bytes, &grid, &bare, &mut second);

        assert_eq!(a, b);
        assert_eq!(first.iter().collect::<Vec<_>>(), second.iter().collect::<Vec<_>>());
        assert_eq!(report.unresolved_tiles, 2);
        assert_eq!(report.unresolved_walls, 1);
        assert_eq!(report.new_placeholders, first.len());

        // Ore once, Torch once per distinct frame (0,0) and (18,0)
        assert_eq!(first.len(), 3);
        let ore = ContentRef::new("Foo", "Ore");
        assert_eq!(first.iter().filter(|i| i.content == ore).count(), 1);
        assert!(first.iter().all(|i| i.content.pack == "Foo"));

        for cell in a.cells() {
            assert_ne!(cell.wall, registry.wall_id("Foo", "Brick").unwrap());
            if cell.active && cell.tile_type == bare.placeholder_tile() {
                assert!(first.identity_at(cell.frame_x, cell.frame_y).is_some());
            }
        }
    }

    #[test]
    fn test_placeholders_survive_resave() {
        let registry = foo_registry();
        let grid = sample_grid(&registry);
        let bytes = save(&grid, &registry, &PlaceholderRegistry::new());
        let bare = bare_registry();

        let mut placeholders = PlaceholderRegistry::new();
        let (limbo, _) = load(&bytes, &grid, &bare, &mut placeholders);

        // saved again while the pack is still missing
        let resaved = save(&limbo, &bare, &placeholders);
        let directory = TypeDirectory::read(&mut BinaryReader::new(&resaved)).unwrap();
        let names: Vec<_> = directory.tiles.iter().map(|e| e.content.to_string()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"Foo:Ore".to_string()));
        assert!(names.contains(&"Foo:Torch".to_string()));
        let torch = directory.tiles.iter().find(|e| e.content.name == "Torch").unwrap();
        assert!(torch.frame_important);
        assert!(directory.walls.is_empty());

        // loading the resave with the pack present restores the tiles
        let (restored, report) = load(&resaved, &limbo, &registry, &mut PlaceholderRegistry::new());
        assert_eq!(report.unresolved_tiles, 0);
        for (before, after) in grid.cells().iter().zip(restored.cells()) {
            assert_eq!(before.active, after.active);
            assert_eq!(before.tile_type, after.tile_type);
            assert_eq!((before.frame_x, before.frame_y), (after.frame_x, after.frame_y));
            assert_eq!(before.color, after.color);
        }
    }

    #[test]
    fn test_resave_without_pack_is_stable() {
        let registry = foo_registry();
        let grid = sample_grid(&registry);
        let bytes = save(&grid, &registry, &PlaceholderRegistry::new());
        let bare = bare_registry();

        let mut placeholders = PlaceholderRegistry::new();
        let (limbo, _) = load(&bytes, &grid, &bare, &mut placeholders);
        let resaved = save(&limbo, &bare, &placeholders);

        let mut again = PlaceholderRegistry::new();
        let (limbo_again, _) = load(&resaved, &limbo, &bare, &mut again);
        assert_eq!(save(&limbo_again, &bare, &again), resaved);
    }

    #[test]
    fn test_truncated_body() {
        let registry = foo_registry();
        let grid = sample_grid(&registry);
        let bytes = save(&grid, &registry, &PlaceholderRegistry::new());

        let mut target = TileGrid::new(grid.width(), grid.height());
        let mut reader = BinaryReader::new(&bytes[..bytes.len() - 2]);
        let err = read_tiles(&mut reader, &mut target, &registry, &mut PlaceholderRegistry::new())
            .unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_unknown_saved_id_in_body() {
        let registry = foo_registry();
        let mut writer = BinaryWriter::new();
        TypeDirectory::default().write(&mut writer);
        // skip 0, tile record naming id 999 which the directory lacks
        writer.write_bytes(&[0, 0x01, 0xE7, 0x03]);
        let bytes = writer.into_vec();

        let mut grid = TileGrid::new(2, 2);
        let err = read_tiles(
            &mut BinaryReader::new(&bytes),
            &mut grid,
            &registry,
            &mut PlaceholderRegistry::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnknownSavedTile(999)));
    }

    #[test]
    fn test_rebuilt_placeholder_list_resaves_identically() {
        let registry = foo_registry();
        let grid = sample_grid(&registry);
        let bytes = save(&grid, &registry, &PlaceholderRegistry::new());
        let bare = bare_registry();

        let mut placeholders = PlaceholderRegistry::new();
        let (limbo, _) = load(&bytes, &grid, &bare, &mut placeholders);
        let resaved = save(&limbo, &bare, &placeholders);

        // as if the list had been stored next to the world and read back
        let rebuilt = PlaceholderRegistry::from_identities(placeholders.iter().cloned()).unwrap();
        assert_eq!(save(&limbo, &bare, &rebuilt), resaved);
    }

    #[test]
    fn test_placeholder_with_unknown_frame_saved_as_plain_placeholder() {
        let registry = foo_registry();
        let placeholder = registry.placeholder_tile();
        let mut grid = TileGrid::new(1, 2);
        grid.set(0, 1, Cell::tile(placeholder, 7, 0));

        // no identity has index 7
        let bytes = save(&grid, &registry, &PlaceholderRegistry::new());
        let directory = TypeDirectory::read(&mut BinaryReader::new(&bytes)).unwrap();
        assert_eq!(
            directory.tiles,
            [TileEntry {
                saved_id: placeholder,
                content: ContentRef::new(crate::content::BUILTIN_PACK, crate::content::PLACEHOLDER_NAME),
                frame_important: true,
            }]
        );

        let mut placeholders = PlaceholderRegistry::new();
        let (loaded, report) = load(&bytes, &grid, &registry, &mut placeholders);
        assert_eq!(loaded, grid);
        assert_eq!((loaded.get(0, 1).frame_x, loaded.get(0, 1).frame_y), (7, 0));
        assert_eq!(report.unresolved_tiles, 0);
        assert!(placeholders.is_empty());
    }
}
