//! Foreign armor shown on mannequins.
//!
//! A mannequin tile stores its armor slot in `frame_x / 100` and its row (head, body,
//! legs) in `frame_y / 18`. The host format only keeps `frame_x % 100`; foreign slots
//! are carried here by name and added back on load.

use std::collections::BTreeSet;

use ahash::AHashMap;

use crate::codec::{BinaryReader, BinaryWriter};
use crate::content::{ContentRef, ContentRegistry, EquipCategory};
use crate::error::{Error, Result};
use crate::world::{Cell, Grid, GridScanner, Position};

const SLOT_STRIDE: i16 = 100;
const ROW_HEIGHT: i16 = 18;
/// Left-half frames are multiples of this (facing left or right)
const LEFT_FRAME_STEP: i16 = 36;
const END_OF_POSITIONS: i32 = -1;

/// Category and slot of a mannequin cell showing foreign armor
fn foreign_slot<R: ContentRegistry>(cell: &Cell, registry: &R) -> Option<(EquipCategory, u16)> {
    if !cell.active || !registry.is_mannequin(cell.tile_type) {
        return None;
    }
    if cell.frame_x < 0 || cell.frame_y < 0 {
        return None;
    }
    let category = EquipCategory::from_u8(u8::try_from(cell.frame_y / ROW_HEIGHT).ok()?)?;
    let slot = (cell.frame_x / SLOT_STRIDE) as u16;
    registry
        .limits()
        .is_foreign_equip(category, slot)
        .then_some((category, slot))
}

/// `frame_x` as the host format should store it, without any foreign slot
pub fn vanilla_frame_x<R: ContentRegistry>(cell: &Cell, registry: &R) -> i16 {
    match foreign_slot(cell, registry) {
        Some(_) => cell.frame_x % SLOT_STRIDE,
        None => cell.frame_x,
    }
}

/// Apply [`vanilla_frame_x`] to every cell of `grid`
pub fn strip_foreign_equips<G: Grid, R: ContentRegistry>(grid: &mut G, registry: &R) {
    let scanner = GridScanner::new(grid.width(), grid.height(), *registry.limits());
    for pos in scanner.positions() {
        let mut cell = grid.cell(pos);
        let frame_x = vanilla_frame_x(&cell, registry);
        if frame_x != cell.frame_x {
            cell.frame_x = frame_x;
            grid.set_cell(pos, cell);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MannequinEntry {
    pub x: i32,
    pub y: i32,
    pub category: EquipCategory,
    pub slot: u16,
}

/// Write-side equip directory and position list
#[derive(Debug, Clone, Default)]
pub struct EquipSection {
    slots: [BTreeSet<u16>; 3],
    entries: Vec<MannequinEntry>,
}

impl EquipSection {
    pub fn collect<G: Grid, R: ContentRegistry>(grid: &G, registry: &R) -> Self {
        let mut section = Self::default();
        let scanner = GridScanner::new(grid.width(), grid.height(), *registry.limits());
        for pos in scanner.positions() {
            let cell = grid.cell(pos);
            let Some((category, slot)) = foreign_slot(&cell, registry) else {
                continue;
            };
            section.slots[category as usize].insert(slot);
            if (cell.frame_x % SLOT_STRIDE) % LEFT_FRAME_STEP == 0 {
                section.entries.push(MannequinEntry {
                    x: pos.x as i32,
                    y: pos.y as i32,
                    category,
                    slot,
                });
            }
        }
        section
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(BTreeSet::is_empty)
    }

    pub fn entries(&self) -> &[MannequinEntry] {
        &self.entries
    }

    pub fn write<R: ContentRegistry>(&self, writer: &mut BinaryWriter, registry: &R) -> Result<()> {
        for category in EquipCategory::ALL {
            let slots = &self.slots[category as usize];
            writer.write_u16_le(slots.len() as u16);
            for &slot in slots {
                let content = registry
                    .equip_content(category, slot)
                    .ok_or(Error::UnregisteredEquip { category, slot })?;
                writer.write_u16_le(slot);
                writer.write_string(&content.pack);
                writer.write_string(&content.name);
            }
        }
        for entry in &self.entries {
            writer.write_i32_le(entry.x);
            writer.write_i32_le(entry.y);
            writer.write_u8(entry.category as u8);
            writer.write_u16_le(entry.slot);
        }
        writer.write_i32_le(END_OF_POSITIONS);
        Ok(())
    }
}

/// Saved slot to runtime slot, per category. Unloaded armor maps to slot 0.
#[derive(Debug, Clone, Default)]
pub struct EquipRemap {
    tables: [AHashMap<u16, u16>; 3],
}

impl EquipRemap {
    pub fn read<R: ContentRegistry>(reader: &mut BinaryReader, registry: &R) -> Result<Self> {
        let mut remap = Self::default();
        for category in EquipCategory::ALL {
            let count = reader.read_u16_le()?;
            for _ in 0..count {
                let slot = reader.read_u16_le()?;
                let pack = reader.read_string()?;
                let name = reader.read_string()?;
                let content = ContentRef { pack, name };
                let runtime = registry
                    .resolve_equip_slot(category, &content)
                    .unwrap_or_else(|| {
                        tracing::warn!(?category, slot, %content, "equip not loaded, clearing");
                        0
                    });
                remap.tables[category as usize].insert(slot, runtime);
            }
        }
        Ok(remap)
    }

    pub fn slot(&self, category: EquipCategory, saved: u16) -> Result<u16> {
        self.tables[category as usize]
            .get(&saved)
            .copied()
            .ok_or(Error::UnknownSavedSlot { category, slot: saved })
    }
}

fn is_left_half(left: &Cell, right: &Cell, category: EquipCategory) -> bool {
    left.active
        && right.active
        && left.tile_type == right.tile_type
        && (left.frame_x == 0 || left.frame_x == LEFT_FRAME_STEP)
        && right.frame_x == left.frame_x + ROW_HEIGHT
        && left.frame_y / ROW_HEIGHT == category as i16
        && left.frame_y == right.frame_y
}

/// Read the position list and put remapped slots back onto mannequins.
///
/// Returns how many mannequin rows were restored. Rows whose tiles no longer form
/// a mannequin are skipped.
pub fn read_positions<G: Grid, R: ContentRegistry>(
    reader: &mut BinaryReader,
    grid: &mut G,
    registry: &R,
    remap: &EquipRemap,
) -> Result<usize> {
    let mut restored = 0;
    loop {
        let x = reader.read_i32_le()?;
        if x == END_OF_POSITIONS {
            return Ok(restored);
        }
        let y = reader.read_i32_le()?;
        let category_byte = reader.read_u8()?;
        let saved_slot = reader.read_u16_le()?;

        let category =
            EquipCategory::from_u8(category_byte).ok_or(Error::InvalidEquipCategory(category_byte))?;
        let slot = remap.slot(category, saved_slot)?;

        let in_bounds = x
            .checked_add(1)
            .is_some_and(|right_x| grid.contains(x, y) && grid.contains(right_x, y));
        if !in_bounds {
            return Err(Error::PositionOutOfBounds { x, y });
        }
        let left_pos = Position::new(x as u32, y as u32);
        let mut left = grid.cell(left_pos);
        let right = grid.cell(Position::new(x as u32 + 1, y as u32));

        if !registry.is_mannequin(left.tile_type) || !is_left_half(&left, &right, category) {
            tracing::warn!(x, y, ?category, "no mannequin at saved position, skipping");
            continue;
        }
        let shifted = i32::from(left.frame_x) + i32::from(SLOT_STRIDE) * i32::from(slot);
        let Ok(frame_x) = i16::try_from(shifted) else {
            tracing::warn!(x, y, slot, "equip slot does not fit in a frame, skipping");
            continue;
        };
        left.frame_x = frame_x;
        grid.set_cell(left_pos, left);
        restored += 1;
    }
}
