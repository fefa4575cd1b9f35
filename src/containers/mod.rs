//! Extension section for foreign content kept inside fixtures.
//!
//! ```text
//! Section := (absent) | u8 flag_count, u8 flags, [EquipSection], [ItemFrames]
//! EquipSection := 3 x (u16 count, count x (u16 slot, string pack, string name)),
//!                 (i32 x, i32 y, u8 category, u16 slot)*, i32 -1
//! ItemFrames := i32 count, count x (i32 fixture_id, payload)
//! ```

pub mod equip;
pub mod item_frame;

pub use crate::content::EquipCategory;
pub use equip::{strip_foreign_equips, vanilla_frame_x, EquipRemap, EquipSection, MannequinEntry};
pub use item_frame::{ItemFrames, ItemSerializer};

use bitflags::bitflags;

use crate::codec::{BinaryReader, BinaryWriter};
use crate::content::ContentRegistry;
use crate::error::Result;
use crate::world::Grid;

bitflags! {
    /// Which parts follow the flags byte
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ContainerFlags: u8 {
        const EQUIP = 0x01;
        const ITEM_FRAMES = 0x02;
    }
}

/// Encode foreign mannequin slots and framed items, or `None` if there are none
pub fn write_containers<G, R, S>(
    grid: &G,
    registry: &R,
    frames: &ItemFrames<S::Item>,
    serializer: &S,
) -> Result<Option<Vec<u8>>>
where
    G: Grid,
    R: ContentRegistry,
    S: ItemSerializer,
{
    let equips = EquipSection::collect(grid, registry);
    let items = frames.to_save(serializer);

    let mut flags = ContainerFlags::empty();
    flags.set(ContainerFlags::EQUIP, !equips.is_empty());
    flags.set(ContainerFlags::ITEM_FRAMES, !items.is_empty());
    if flags.is_empty() {
        tracing::debug!("no foreign fixtures, section omitted");
        return Ok(None);
    }

    let mut writer = BinaryWriter::new();
    writer.write_u8(1);
    writer.write_u8(flags.bits());
    if flags.contains(ContainerFlags::EQUIP) {
        equips.write(&mut writer, registry)?;
    }
    if flags.contains(ContainerFlags::ITEM_FRAMES) {
        item_frame::write_items(&mut writer, &items, serializer);
    }

    tracing::debug!(
        mannequins = equips.entries().len(),
        items = items.len(),
        bytes = writer.len(),
        "container section written"
    );
    Ok(Some(writer.into_vec()))
}

/// Decode a section written by [`write_containers`].
///
/// Run after the host has restored its own tiles and fixtures: mannequin slots are
/// added onto existing frames and items go into fixtures already in `frames`.
pub fn read_containers<G, R, S>(
    reader: &mut BinaryReader,
    grid: &mut G,
    registry: &R,
    frames: &mut ItemFrames<S::Item>,
    serializer: &S,
) -> Result<()>
where
    G: Grid,
    R: ContentRegistry,
    S: ItemSerializer,
{
    let flag_count = reader.read_u8()?;
    let flag_bytes = reader.read_bytes(usize::from(flag_count))?;
    let flags = flag_bytes
        .first()
        .map_or(ContainerFlags::empty(), |&b| ContainerFlags::from_bits_truncate(b));

    let mut mannequins = 0;
    if flags.contains(ContainerFlags::EQUIP) {
        let remap = EquipRemap::read(reader, registry)?;
        mannequins = equip::read_positions(reader, grid, registry, &remap)?;
    }
    let mut items = 0;
    if flags.contains(ContainerFlags::ITEM_FRAMES) {
        items = item_frame::read_items(reader, frames, serializer)?;
    }

    tracing::info!(mannequins, items, "container section loaded");
    Ok(())
}
