//! Body stream: skip spans and records, in scan order.
//!
//! A skip span is one count byte. `255` means "255 cells skipped, another count
//! byte follows". The final count of a span may be `0` when a record comes right
//! after an escape. A chained record is not preceded by any skip byte. The body
//! has no terminator; it ends when the scan leaves the grid.

use super::directory::{RemapTable, SaveTable};
use super::placeholder::PlaceholderRegistry;
use super::record::{decode_record, encode_record, DecodeStats};
use crate::codec::{BinaryReader, BinaryWriter};
use crate::content::ContentRegistry;
use crate::error::Result;
use crate::world::{Grid, GridScanner};

const SKIP_ESCAPE: u8 = u8::MAX;

pub fn write_body<G: Grid, R: ContentRegistry>(
    writer: &mut BinaryWriter,
    grid: &G,
    table: &SaveTable<'_, R>,
) {
    let scanner = GridScanner::new(grid.width(), grid.height(), *table.registry().limits());
    let mut skip: u8 = 0;
    let mut chained = false;
    let mut pos = scanner.first();

    while let Some(p) = pos {
        let cell = grid.cell(p);
        if scanner.has_foreign_data(&cell) {
            if !chained {
                writer.write_u8(skip);
                skip = 0;
            }
            let end = encode_record(writer, grid, &scanner, table, p);
            chained = end.chained;
            pos = scanner.advance(end.last);
        } else {
            skip += 1;
            if skip == SKIP_ESCAPE {
                writer.write_u8(skip);
                skip = 0;
            }
            pos = scanner.advance(p);
        }
    }

    if skip > 0 {
        writer.write_u8(skip);
    }
}

pub fn read_body<G: Grid>(
    reader: &mut BinaryReader,
    grid: &mut G,
    scanner: &GridScanner,
    remap: &RemapTable,
    placeholders: &mut PlaceholderRegistry,
) -> Result<DecodeStats> {
    let mut stats = DecodeStats::default();
    let mut chained = false;
    let mut pos = scanner.first();

    while let Some(mut p) = pos {
        if !chained {
            let mut skip = reader.read_u8()?;
            while skip == SKIP_ESCAPE {
                match scanner.skip(p, SKIP_ESCAPE) {
                    Some(next) => p = next,
                    None => return Ok(stats),
                }
                skip = reader.read_u8()?;
            }
            match scanner.skip(p, skip) {
                Some(next) => p = next,
                None => return Ok(stats),
            }
        }
        let end = decode_record(reader, grid, scanner, remap, placeholders, p, &mut stats)?;
        chained = end.chained;
        pos = scanner.advance(end.last);
    }

    Ok(stats)
}
