//! Fixtures shared by the unit tests.

use crate::codec::{BinaryReader, BinaryWriter};
use crate::containers::ItemSerializer;
use crate::content::{ContentRef, ContentRegistry, EquipCategory, StaticRegistry, VanillaLimits, BUILTIN_PACK};
use crate::error::Result;
use crate::world::{Cell, TileGrid};

pub const DIRT: u16 = 0;
pub const STONE: u16 = 1;
pub const MANNEQUIN: u16 = 128;
pub const WOOD_WALL: u16 = 4;

pub fn world_limits() -> VanillaLimits {
    VanillaLimits::default()
}

/// Registry without any content pack
pub fn bare_registry() -> StaticRegistry {
    StaticRegistry::new(world_limits())
}

fn add_foo(registry: &mut StaticRegistry) {
    registry.add_tile("Foo", "Ore", false);
    registry.add_tile("Foo", "Torch", true);
    registry.add_wall("Foo", "Brick");
    registry.add_equip(EquipCategory::Head, "Foo", "Helm");
    registry.add_equip(EquipCategory::Body, "Foo", "Shirt");
    registry.add_equip(EquipCategory::Legs, "Foo", "Pants");
}

/// Registry with pack "Foo" loaded
pub fn foo_registry() -> StaticRegistry {
    let mut registry = bare_registry();
    add_foo(&mut registry);
    registry
}

/// Same content as [`foo_registry`] under different runtime ids
pub fn reordered_registry() -> StaticRegistry {
    let mut registry = bare_registry();
    registry.add_tile("Bar", "Crystal", true);
    registry.add_tile("Bar", "Sand", false);
    registry.add_wall("Bar", "Glass");
    registry.add_equip(EquipCategory::Head, "Bar", "Hood");
    registry.add_equip(EquipCategory::Legs, "Bar", "Boots");
    add_foo(&mut registry);
    registry
}

/// 40x30 world mixing built-in and "Foo" content
pub fn sample_grid(registry: &StaticRegistry) -> TileGrid {
    let ore = registry.tile_id("Foo", "Ore").unwrap();
    let torch = registry.tile_id("Foo", "Torch").unwrap();
    let brick = registry.wall_id("Foo", "Brick").unwrap();

    let mut grid = TileGrid::new(40, 30);
    for x in 0..40 {
        for y in 20..30 {
            grid.set(x, y, Cell::tile(DIRT, 0, 0).with_wall(WOOD_WALL));
        }
    }
    for x in 5..15 {
        for y in 0..30 {
            grid.set(x, y, Cell::tile(ore, -1, -1));
        }
    }
    for y in 3..6 {
        grid.get_mut(8, y).color = 7;
    }
    for x in 10..25 {
        for y in 10..15 {
            let cell = grid.get_mut(x, y);
            if !cell.active {
                *cell = Cell::tile(STONE, 0, 0);
            }
            cell.wall = brick;
            if x < 18 {
                cell.wall_color = 3;
            }
        }
    }
    grid.set(20, 5, Cell::tile(torch, 0, 0));
    grid.set(21, 5, Cell::tile(torch, 18, 0));
    grid.set(22, 5, Cell::tile(torch, 0, 0).with_color(2));
    grid.set(30, 2, Cell::wall(brick));
    grid
}

/// What the host's own format would have restored before the foreign section
pub fn vanilla_layer(grid: &TileGrid, registry: &impl ContentRegistry) -> TileGrid {
    let limits = *registry.limits();
    let mut base = grid.clone();
    for cell in base.cells_mut() {
        if cell.active && limits.is_foreign_tile(cell.tile_type) {
            *cell = Cell { wall: cell.wall, wall_color: cell.wall_color, ..Cell::default() };
        }
        if limits.is_foreign_wall(cell.wall) {
            cell.wall = 0;
            cell.wall_color = 0;
        }
    }
    base
}

/// A 2x3 mannequin with its left column at (x, y)
pub fn place_mannequin(grid: &mut TileGrid, x: u32, y: u32, slots: [u16; 3]) {
    for (row, slot) in slots.into_iter().enumerate() {
        let frame_y = row as i16 * 18;
        grid.set(x, y + row as u32, Cell::tile(MANNEQUIN, slot as i16 * 100, frame_y));
        grid.set(x + 1, y + row as u32, Cell::tile(MANNEQUIN, 18, frame_y));
    }
}

/// Item held by an item frame in the tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeldItem {
    pub content: Option<ContentRef>,
    pub stack: i32,
}

impl HeldItem {
    pub fn new(pack: &str, name: &str, stack: i32) -> Self {
        Self { content: Some(ContentRef::new(pack, name)), stack }
    }

    pub fn empty() -> Self {
        Self { content: None, stack: 0 }
    }
}

/// Saves every item outside the built-in pack
pub struct HeldItemSerializer;

impl ItemSerializer for HeldItemSerializer {
    type Item = HeldItem;

    fn needs_saving(&self, item: &HeldItem) -> bool {
        item.content.as_ref().is_some_and(|c| c.pack != BUILTIN_PACK)
    }

    fn write_item(&self, item: &HeldItem, writer: &mut BinaryWriter) {
        let content = item.content.clone().unwrap_or_else(|| ContentRef::new("", ""));
        writer.write_string(&content.pack);
        writer.write_string(&content.name);
        writer.write_i32_le(item.stack);
    }

    fn read_item(&self, reader: &mut BinaryReader) -> Result<HeldItem> {
        let pack = reader.read_string()?;
        let name = reader.read_string()?;
        let stack = reader.read_i32_le()?;
        Ok(HeldItem { content: Some(ContentRef { pack, name }), stack })
    }
}
