//! # Bundle Preview
//!
//! Draws every tile of a bundle in its assigned palette onto one contact sheet, for checking a
//! packed bundle by eye.

use std::{fs, path::Path};

use image::RgbaImage;

use crate::{
    bundle::Bundle,
    error::{PackError, Result},
    tiles::{Palette, Tile, TILE_DIM},
};

pub const DEFAULT_COLUMNS: u32 = 16;

fn render_tile_at(img: &mut RgbaImage, tile: &Tile, palette: &Palette, base_x: u32, base_y: u32) {
    for (i, &index) in tile.decode().iter().enumerate() {
        let x = i as u32 % TILE_DIM;
        let row = i as u32 / TILE_DIM;
        // Bitplane row 0 is the bottom scanline
        let y = TILE_DIM - 1 - row;
        img.put_pixel(base_x + x, base_y + y, palette.0[index as usize]);
    }
}

/// Renders tile `i` at cell `(i % columns, i / columns)`.
///
/// `columns` is clamped to `1..=tile count`. A tile whose palette index is out of range is drawn
/// with the all-zero palette.
pub fn render_tile_sheet(bundle: &Bundle, columns: u32) -> RgbaImage {
    let count = bundle.tiles.len() as u32;
    let columns = columns.min(count).max(1);
    let rows = count.div_ceil(columns).max(1);
    let mut img = RgbaImage::new(columns * TILE_DIM, rows * TILE_DIM);

    let fallback = Palette::default();
    for (i, tile) in bundle.tiles.iter().enumerate() {
        let palette = bundle
            .tile_to_palette
            .get(i)
            .and_then(|&p| bundle.palettes.get(p as usize))
            .unwrap_or(&fallback);

        let i = i as u32;
        render_tile_at(
            &mut img,
            tile,
            palette,
            (i % columns) * TILE_DIM,
            (i / columns) * TILE_DIM,
        );
    }

    img
}

pub fn write_tile_sheet(bundle: &Bundle, columns: u32, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    render_tile_sheet(bundle, columns)
        .save(path)
        .map_err(|e| PackError::Encode(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::ZERO_PIXEL;
    use image::Rgba;

    #[test]
    fn test_sheet_dimensions() {
        let bundle = Bundle {
            tiles: vec![Tile::default(); 17],
            palettes: vec![Palette::default()],
            tile_to_palette: vec![0; 17],
            levels: Vec::new(),
        };
        let img = render_tile_sheet(&bundle, 16);
        assert_eq!(img.dimensions(), (128, 16));

        let empty = render_tile_sheet(&Bundle::default(), 4);
        assert_eq!(empty.dimensions(), (8, 8));
    }

    #[test]
    fn test_huge_column_count_is_clamped() {
        let bundle = Bundle {
            tiles: vec![Tile::default(); 3],
            palettes: vec![Palette::default()],
            tile_to_palette: vec![0; 3],
            levels: Vec::new(),
        };
        let img = render_tile_sheet(&bundle, u32::MAX / 4);
        assert_eq!(img.dimensions(), (24, 8));
        let img = render_tile_sheet(&bundle, u32::MAX);
        assert_eq!(img.dimensions(), (24, 8));
    }

    #[test]
    fn test_save_failure_is_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.unknown");
        let err = write_tile_sheet(&Bundle::default(), 4, &path).unwrap_err();
        assert!(matches!(err, PackError::Encode(_)));
        assert!(!err.to_string().contains("decode"));
    }

    #[test]
    fn test_tile_drawn_in_palette_bottom_up() {
        let red = Rgba([255, 0, 0, 255]);
        let blue = Rgba([0, 0, 255, 255]);
        let mut tile = Tile::default();
        tile.set_index(2, 0, 1);
        let bundle = Bundle {
            tiles: vec![Tile::default(), tile],
            palettes: vec![Palette::from_colours(&[red, blue])],
            tile_to_palette: vec![0, 0],
            levels: Vec::new(),
        };
        let img = render_tile_sheet(&bundle, 2);
        assert_eq!(*img.get_pixel(8 + 2, 7), blue);
        assert_eq!(*img.get_pixel(8 + 2, 0), red);
        assert_eq!(*img.get_pixel(0, 0), red);
    }

    #[test]
    fn test_out_of_range_palette_uses_zero_palette() {
        let mut tile = Tile::default();
        tile.set_index(0, 0, 3);
        let bundle = Bundle {
            tiles: vec![tile],
            palettes: Vec::new(),
            tile_to_palette: vec![5],
            levels: Vec::new(),
        };
        let img = render_tile_sheet(&bundle, 1);
        assert_eq!(*img.get_pixel(0, 7), ZERO_PIXEL);
    }
}
