//! # Chunk Codec
//!
//! A chunk is a 4-byte tag, a `u32` little-endian record count, then that many fixed-size records.
//! Chunks are read in a fixed order and are never skipped, so a tag mismatch means the data is
//! corrupt.
//!
//! Record layouts:
//!
//! | Record    | Size | Layout                                                           |
//! |-----------|------|------------------------------------------------------------------|
//! | `Tile`    | 16   | `bit0[8]`, `bit1[8]`                                             |
//! | `Palette` | 16   | 4 x `r, g, b, a`                                                 |
//! | `u32`     | 4    | little-endian                                                    |
//! | `Level`   | 1208 | 5 grids of 16x15 bytes (0/1, `x * 15 + y`) in order top blocks,  |
//! |           |      | blocks, ladders, hazards, boxes; then start `x`, `y` as `f32` LE |

use std::io::Cursor;

use image::Rgba;

use crate::{
    binary_utils::{read_array, read_f32_le, read_u32_le, remaining, write_f32_le, write_u32_le},
    error::{PackError, Result},
    level::{CellFlags, Level, LEVEL_HEIGHT, LEVEL_WIDTH},
    tiles::{Palette, Tile, COLOURS_PER_PALETTE},
};

pub type Tag = [u8; 4];

/// A fixed-size record that can be stored in a chunk.
pub trait ChunkRecord: Sized {
    const SIZE: usize;

    fn write_record(&self, out: &mut Vec<u8>);
    fn read_record(cursor: &mut Cursor<&[u8]>) -> Result<Self>;
}

pub fn write_chunk<T: ChunkRecord>(tag: &Tag, records: &[T], out: &mut Vec<u8>) {
    out.reserve(8 + records.len() * T::SIZE);
    out.extend_from_slice(tag);
    write_u32_le(out, records.len() as u32);
    for record in records {
        record.write_record(out);
    }
}

pub fn read_chunk<T: ChunkRecord>(cursor: &mut Cursor<&[u8]>, tag: &Tag) -> Result<Vec<T>> {
    let found: Tag = read_array(cursor)?;
    if &found != tag {
        return Err(PackError::CorruptBundle {
            expected: String::from_utf8_lossy(tag).into_owned(),
            found: String::from_utf8_lossy(&found).into_owned(),
        });
    }

    let count = read_u32_le(cursor)? as usize;
    let needed = count as u64 * T::SIZE as u64;
    let available = remaining(cursor);
    if needed > available {
        return Err(PackError::TruncatedBundle(format!(
            "chunk '{}' declares {} records ({} bytes) but only {} bytes remain",
            String::from_utf8_lossy(tag),
            count,
            needed,
            available
        )));
    }

    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        records.push(T::read_record(cursor)?);
    }
    Ok(records)
}

impl ChunkRecord for Tile {
    const SIZE: usize = 16;

    fn write_record(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.bit0);
        out.extend_from_slice(&self.bit1);
    }

    fn read_record(cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        Ok(Tile {
            bit0: read_array(cursor)?,
            bit1: read_array(cursor)?,
        })
    }
}

impl ChunkRecord for Palette {
    const SIZE: usize = 4 * COLOURS_PER_PALETTE;

    fn write_record(&self, out: &mut Vec<u8>) {
        for colour in &self.0 {
            out.extend_from_slice(&colour.0);
        }
    }

    fn read_record(cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        let mut palette = Palette::default();
        for slot in &mut palette.0 {
            *slot = Rgba(read_array(cursor)?);
        }
        Ok(palette)
    }
}

impl ChunkRecord for u32 {
    const SIZE: usize = 4;

    fn write_record(&self, out: &mut Vec<u8>) {
        write_u32_le(out, *self);
    }

    fn read_record(cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        read_u32_le(cursor)
    }
}

const LEVEL_CELLS: usize = LEVEL_WIDTH * LEVEL_HEIGHT;

impl ChunkRecord for Level {
    const SIZE: usize = CellFlags::ALL.len() * LEVEL_CELLS + 8;

    fn write_record(&self, out: &mut Vec<u8>) {
        for flag in CellFlags::ALL {
            for column in &self.cells {
                out.extend(column.iter().map(|cell| cell.contains(flag) as u8));
            }
        }
        write_f32_le(out, self.starting_pos.0);
        write_f32_le(out, self.starting_pos.1);
    }

    fn read_record(cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        let mut level = Level::default();
        for flag in CellFlags::ALL {
            let grid: [u8; LEVEL_CELLS] = read_array(cursor)?;
            for (i, &byte) in grid.iter().enumerate() {
                if byte != 0 {
                    level.cells[i / LEVEL_HEIGHT][i % LEVEL_HEIGHT] |= flag;
                }
            }
        }
        level.starting_pos = (read_f32_le(cursor)?, read_f32_le(cursor)?);
        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_header_layout() {
        let mut out = Vec::new();
        write_chunk(b"tmap", &[7u32, 1], &mut out);
        assert_eq!(
            out,
            vec![b't', b'm', b'a', b'p', 2, 0, 0, 0, 7, 0, 0, 0, 1, 0, 0, 0]
        );
    }

    #[test]
    fn test_empty_chunk() {
        let mut out = Vec::new();
        write_chunk::<Tile>(b"tile", &[], &mut out);
        assert_eq!(out.len(), 8);
        let mut cursor = Cursor::new(&out[..]);
        let tiles: Vec<Tile> = read_chunk(&mut cursor, b"tile").unwrap();
        assert!(tiles.is_empty());
    }

    #[test]
    fn test_tag_mismatch_is_corrupt() {
        let mut out = Vec::new();
        write_chunk(b"pale", &[Palette::default()], &mut out);
        let mut cursor = Cursor::new(&out[..]);
        let err = read_chunk::<Palette>(&mut cursor, b"tile").unwrap_err();
        match err {
            PackError::CorruptBundle { expected, found } => {
                assert_eq!(expected, "tile");
                assert_eq!(found, "pale");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_short_record_is_truncated() {
        let mut out = Vec::new();
        write_chunk(b"tile", &[Tile::default(), Tile::default()], &mut out);
        out.truncate(out.len() - 1);
        let mut cursor = Cursor::new(&out[..]);
        let err = read_chunk::<Tile>(&mut cursor, b"tile").unwrap_err();
        assert!(matches!(err, PackError::TruncatedBundle(_)));

        // Cut inside the header
        let mut cursor = Cursor::new(&out[..6]);
        let err = read_chunk::<Tile>(&mut cursor, b"tile").unwrap_err();
        assert!(matches!(err, PackError::TruncatedBundle(_)));
    }

    #[test]
    fn test_huge_count_does_not_allocate() {
        let mut out = Vec::new();
        out.extend_from_slice(b"lvls");
        write_u32_le(&mut out, u32::MAX);
        let mut cursor = Cursor::new(&out[..]);
        let err = read_chunk::<Level>(&mut cursor, b"lvls").unwrap_err();
        assert!(matches!(err, PackError::TruncatedBundle(_)));
    }

    #[test]
    fn test_level_record_layout() {
        let mut level = Level::default();
        level.cells[1][2] = CellFlags::LADDER | CellFlags::BOX;
        level.starting_pos = (6.0, 10.0);

        let mut out = Vec::new();
        level.write_record(&mut out);
        assert_eq!(out.len(), Level::SIZE);
        assert_eq!(Level::SIZE, 1208);

        let index = 15 + 2;
        assert_eq!(out[2 * LEVEL_CELLS + index], 1); // ladders grid
        assert_eq!(out[4 * LEVEL_CELLS + index], 1); // boxes grid
        assert_eq!(out.iter().take(5 * LEVEL_CELLS).filter(|&&b| b != 0).count(), 2);
        assert_eq!(&out[1200..1204], &6.0f32.to_le_bytes());

        let mut cursor = Cursor::new(&out[..]);
        assert_eq!(Level::read_record(&mut cursor).unwrap(), level);
    }

    #[test]
    fn test_any_nonzero_grid_byte_sets_flag() {
        let mut out = Vec::new();
        Level::default().write_record(&mut out);
        // hazards grid, cell (0, 4)
        out[3 * LEVEL_CELLS + 4] = 2;
        out[3 * LEVEL_CELLS + 5] = 0xFF;
        let mut cursor = Cursor::new(&out[..]);
        let level = Level::read_record(&mut cursor).unwrap();
        assert_eq!(level.cell(0, 4), CellFlags::HAZARD);
        assert_eq!(level.cell(0, 5), CellFlags::HAZARD);
        assert_eq!(level.count(CellFlags::HAZARD), 2);
    }

    #[test]
    fn test_palette_record_layout() {
        let palette = Palette([
            Rgba([1, 2, 3, 4]),
            Rgba([5, 6, 7, 8]),
            Rgba([0, 0, 0, 0]),
            Rgba([9, 10, 11, 12]),
        ]);
        let mut out = Vec::new();
        palette.write_record(&mut out);
        assert_eq!(out, vec![1, 2, 3, 4, 5, 6, 7, 8, 0, 0, 0, 0, 9, 10, 11, 12]);
    }
}
