//! One foreign cell's record: a flags byte followed by the fields the flags select.
//!
//! ```text
//! u8 flags
//! [TILE]        u16 saved_type
//!               [frame-important] u8 frame_x_lo [FRAME_X_WIDE u8 frame_x_hi]
//!                                 u8 frame_y_lo [FRAME_Y_WIDE u8 frame_y_hi]
//!               [TILE_COLOR] u8 color
//! [WALL]        u16 saved_wall
//!               [WALL_COLOR] u8 wall_color
//! [RUN]         u8 count of following equivalent cells
//! ```
//!
//! `CHAIN` carries no payload: it tells the reader the next record follows without
//! a skip byte in between.

use bitflags::bitflags;

use super::directory::{RemapTable, SaveTable};
use super::placeholder::PlaceholderRegistry;
use crate::codec::{BinaryReader, BinaryWriter};
use crate::content::ContentRegistry;
use crate::error::{Error, Result};
use crate::world::{Grid, GridScanner, Position};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RecordFlags: u8 {
        /// Active foreign tile follows
        const TILE = 0x01;
        /// frame_x needs a high byte
        const FRAME_X_WIDE = 0x02;
        /// frame_y needs a high byte
        const FRAME_Y_WIDE = 0x04;
        const TILE_COLOR = 0x08;
        /// Foreign wall follows
        const WALL = 0x10;
        const WALL_COLOR = 0x20;
        /// Run count follows
        const RUN = 0x40;
        /// Next scan position holds the next record
        const CHAIN = 0x80;
    }
}

/// Longest run one record can describe
pub const MAX_RUN: u8 = u8::MAX;

/// Where a record ended in the scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordEnd {
    /// Last position covered by the record, including its run
    pub last: Position,
    /// The cell after `last` starts another record
    pub chained: bool,
}

/// Frames outside `0..=255` get a high byte. The low byte alone is read back unsigned.
fn write_frame(payload: &mut BinaryWriter, value: i16) -> bool {
    payload.write_u8(value as u8);
    let wide = !(0..=0xFF).contains(&value);
    if wide {
        payload.write_u8((value >> 8) as u8);
    }
    wide
}

fn read_frame(reader: &mut BinaryReader, wide: bool) -> Result<i16> {
    if wide {
        reader.read_i16_le()
    } else {
        Ok(i16::from(reader.read_u8()?))
    }
}

/// Encode the record for the foreign cell at `pos`, consuming any run after it
pub fn encode_record<G: Grid, R: ContentRegistry>(
    writer: &mut BinaryWriter,
    grid: &G,
    scanner: &GridScanner,
    table: &SaveTable<'_, R>,
    pos: Position,
) -> RecordEnd {
    let cell = grid.cell(pos);
    let limits = scanner.limits();
    let mut flags = RecordFlags::empty();
    let mut payload = BinaryWriter::with_capacity(10);

    if cell.active && limits.is_foreign_tile(cell.tile_type) {
        flags |= RecordFlags::TILE;
        let saved = table.saved_tile(&cell);
        payload.write_u16_le(saved.id);
        if let Some((frame_x, frame_y)) = saved.frame {
            if write_frame(&mut payload, frame_x) {
                flags |= RecordFlags::FRAME_X_WIDE;
            }
            if write_frame(&mut payload, frame_y) {
                flags |= RecordFlags::FRAME_Y_WIDE;
            }
        }
        if cell.color != 0 {
            flags |= RecordFlags::TILE_COLOR;
            payload.write_u8(cell.color);
        }
    }

    if limits.is_foreign_wall(cell.wall) {
        flags |= RecordFlags::WALL;
        payload.write_u16_le(cell.wall);
        if cell.wall_color != 0 {
            flags |= RecordFlags::WALL_COLOR;
            payload.write_u8(cell.wall_color);
        }
    }

    let frame_important = table.run_frame_important(cell.tile_type);
    let mut last = pos;
    let mut run: u8 = 0;
    let mut chained = false;
    while let Some(next) = scanner.advance(last) {
        let other = grid.cell(next);
        if run < MAX_RUN && cell.same_as(&other, frame_important) {
            run += 1;
            last = next;
        } else {
            chained = scanner.has_foreign_data(&other);
            break;
        }
    }

    if run > 0 {
        flags |= RecordFlags::RUN;
        payload.write_u8(run);
    }
    if chained {
        flags |= RecordFlags::CHAIN;
    }

    writer.write_u8(flags.bits());
    writer.write_bytes(payload.as_slice());
    RecordEnd { last, chained }
}

/// Counters collected while decoding records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    pub records: usize,
    pub cells: u64,
    pub placeholder_cells: u64,
}

/// Decode one record into the cell at `pos` and copy it across its run
pub fn decode_record<G: Grid>(
    reader: &mut BinaryReader,
    grid: &mut G,
    scanner: &GridScanner,
    remap: &RemapTable,
    placeholders: &mut PlaceholderRegistry,
    pos: Position,
    stats: &mut DecodeStats,
) -> Result<RecordEnd> {
    let flags = RecordFlags::from_bits_retain(reader.read_u8()?);
    let mut cell = grid.cell(pos);
    let mut placeholder = false;

    if flags.contains(RecordFlags::TILE) {
        let saved_id = reader.read_u16_le()?;
        cell.active = true;
        cell.tile_type = remap.tile(saved_id)?;
        if remap.frame_important(saved_id) {
            cell.frame_x = read_frame(reader, flags.contains(RecordFlags::FRAME_X_WIDE))?;
            cell.frame_y = read_frame(reader, flags.contains(RecordFlags::FRAME_Y_WIDE))?;
        } else {
            cell.frame_x = -1;
            cell.frame_y = -1;
        }
        if let Some(frame) = placeholders.resolve(saved_id, remap, cell.frame_x, cell.frame_y) {
            cell.frame_x = frame.frame_x();
            cell.frame_y = frame.frame_y();
            placeholder = true;
        }
        cell.color = if flags.contains(RecordFlags::TILE_COLOR) {
            reader.read_u8()?
        } else {
            0
        };
    }

    if flags.contains(RecordFlags::WALL) {
        cell.wall = remap.wall(reader.read_u16_le()?)?;
        cell.wall_color = if flags.contains(RecordFlags::WALL_COLOR) {
            reader.read_u8()?
        } else {
            0
        };
    }

    grid.set_cell(pos, cell);
    let mut last = pos;
    let mut cells = 1u64;

    if flags.contains(RecordFlags::RUN) {
        let count = reader.read_u8()?;
        for _ in 0..count {
            last = scanner.advance(last).ok_or(Error::RunPastEnd {
                x: pos.x,
                y: pos.y,
                count,
            })?;
            grid.set_cell(last, cell);
        }
        cells += u64::from(count);
    }

    let chained = flags.contains(RecordFlags::CHAIN);
    if chained && scanner.advance(last).is_none() {
        return Err(Error::ChainPastEnd { x: last.x, y: last.y });
    }

    stats.records += 1;
    stats.cells += cells;
    if placeholder {
        stats.placeholder_cells += cells;
    }

    Ok(RecordEnd { last, chained })
}
