//! # Asset Bundle
//!
//! The bundle file is four chunks back to back with no header, footer or checksum:
//!
//! ```text
//! "tile"  Tile records
//! "pale"  Palette records
//! "tmap"  u32 palette index per tile
//! "lvls"  Level records
//! ```
//!
//! See [`crate::chunk`] for the record layouts. The order is fixed for both writing and reading.

use std::{
    fs,
    io::{Cursor, Write},
    path::Path,
};

use log::{info, warn};
use tempfile::NamedTempFile;

use crate::{
    chunk::{read_chunk, write_chunk, ChunkRecord, Tag},
    error::Result,
    level::Level,
    tiles::{Palette, Tile},
};

pub const TILE_TAG: &Tag = b"tile";
pub const PALETTE_TAG: &Tag = b"pale";
pub const TILE_MAP_TAG: &Tag = b"tmap";
pub const LEVEL_TAG: &Tag = b"lvls";

/// Everything the runtime loads at startup.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bundle {
    pub tiles: Vec<Tile>,
    pub palettes: Vec<Palette>,
    pub tile_to_palette: Vec<u32>,
    pub levels: Vec<Level>,
}

impl Bundle {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            32 + self.tiles.len() * Tile::SIZE
                + self.palettes.len() * Palette::SIZE
                + self.tile_to_palette.len() * u32::SIZE
                + self.levels.len() * Level::SIZE,
        );
        write_chunk(TILE_TAG, &self.tiles, &mut out);
        write_chunk(PALETTE_TAG, &self.palettes, &mut out);
        write_chunk(TILE_MAP_TAG, &self.tile_to_palette, &mut out);
        write_chunk(LEVEL_TAG, &self.levels, &mut out);
        out
    }

    /// Parses a bundle. Index values are not range-checked here.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        let bundle = Bundle {
            tiles: read_chunk(&mut cursor, TILE_TAG)?,
            palettes: read_chunk(&mut cursor, PALETTE_TAG)?,
            tile_to_palette: read_chunk(&mut cursor, TILE_MAP_TAG)?,
            levels: read_chunk(&mut cursor, LEVEL_TAG)?,
        };

        let trailing = data.len() as u64 - cursor.position();
        if trailing > 0 {
            warn!("ignoring {} trailing bytes after the level chunk", trailing);
        }

        Ok(bundle)
    }

    /// Writes the bundle to `path` through a temporary file in the same directory, so a failed
    /// write never leaves a partial bundle behind.
    pub fn write(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let bytes = self.to_bytes();
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(&bytes)?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;

        info!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_bytes(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::PackError, level::CellFlags};
    use image::Rgba;

    fn sample() -> Bundle {
        let mut tile = Tile::default();
        tile.set_index(1, 2, 3);
        let mut level = Level::default();
        level.cells[0][14] = CellFlags::HAZARD;
        level.starting_pos = (2.0, 8.0);
        Bundle {
            tiles: vec![tile, Tile::default()],
            palettes: vec![Palette::from_colours(&[Rgba([1, 2, 3, 255])])],
            tile_to_palette: vec![0, 0],
            levels: vec![level, Level::default()],
        }
    }

    #[test]
    fn test_round_trip() {
        let bundle = sample();
        let bytes = bundle.to_bytes();
        assert_eq!(Bundle::from_bytes(&bytes).unwrap(), bundle);
    }

    #[test]
    fn test_byte_length() {
        let bytes = sample().to_bytes();
        assert_eq!(bytes.len(), 4 * 8 + 2 * 16 + 16 + 2 * 4 + 2 * 1208);
        assert_eq!(&bytes[..4], b"tile");
    }

    #[test]
    fn test_second_tag_corruption() {
        let mut bytes = sample().to_bytes();
        // "pale" starts right after the tile chunk
        let offset = 8 + 2 * 16;
        assert_eq!(&bytes[offset..offset + 4], b"pale");
        bytes[offset..offset + 4].copy_from_slice(b"PALE");
        let err = Bundle::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, PackError::CorruptBundle { .. }));
    }

    #[test]
    fn test_truncated_level_chunk() {
        let bytes = sample().to_bytes();
        let err = Bundle::from_bytes(&bytes[..bytes.len() - 4]).unwrap_err();
        assert!(matches!(err, PackError::TruncatedBundle(_)));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut bytes = sample().to_bytes();
        bytes.extend_from_slice(&[0xAA; 3]);
        assert_eq!(Bundle::from_bytes(&bytes).unwrap(), sample());
    }

    #[test]
    fn test_empty_input() {
        let err = Bundle::from_bytes(&[]).unwrap_err();
        assert!(matches!(err, PackError::TruncatedBundle(_)));
    }
}
