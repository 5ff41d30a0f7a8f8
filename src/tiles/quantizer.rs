//! # Tile Quantizer
//!
//! Cuts a sprite sheet into 8x8 tiles, collects each tile's colours, commits them to the palette
//! table and encodes the tile against the committed palette.
//!
//! Colour collection and bitplane encoding both walk a tile through [`block_pixels`], so the two
//! passes always agree on which grid row is bitplane row 0 for the grid's [`Origin`].

use log::debug;

use super::{Palette, PaletteTable, Tile, COLOURS_PER_PALETTE, MAX_TILES, TILE_DIM};
use crate::{
    error::{PackError, Result},
    pixel::{Origin, Pixel, PixelGrid},
};

/// Tile table, palette table and tile-to-palette map built up across every sheet of a run.
#[derive(Clone, Debug, Default)]
pub struct TileTables {
    pub tiles: Vec<Tile>,
    pub palettes: PaletteTable,
    pub tile_to_palette: Vec<u32>,
}

impl TileTables {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Opaque and not the white matte colour.
pub fn is_palette_colour(pixel: &Pixel) -> bool {
    let [r, g, b, a] = pixel.0;
    a == 0xFF && !(r == 0xFF && g == 0xFF && b == 0xFF)
}

/// Grid row holding bitplane row `row` of the tile in tile-row `tile_y`.
///
/// Bitplane row 0 is the bottom scanline of the tile whichever way the grid is stored.
pub fn grid_row(origin: Origin, tile_y: u32, row: u32) -> u32 {
    match origin {
        Origin::BottomLeft => tile_y * TILE_DIM + row,
        Origin::TopLeft => tile_y * TILE_DIM + (TILE_DIM - 1 - row),
    }
}

/// Every pixel of a tile as `(x, bitplane_row, pixel)`, bitplane row-major.
pub fn block_pixels(
    grid: &PixelGrid,
    tile_x: u32,
    tile_y: u32,
) -> impl Iterator<Item = (u32, u32, Pixel)> + '_ {
    (0..TILE_DIM).flat_map(move |row| {
        let y = grid_row(grid.origin, tile_y, row);
        (0..TILE_DIM).map(move |x| (x, row, grid.get(tile_x * TILE_DIM + x, y)))
    })
}

/// Distinct palette colours of one tile in first-seen order.
pub fn collect_colours(grid: &PixelGrid, tile_x: u32, tile_y: u32) -> Result<Vec<Pixel>> {
    let mut colours: Vec<Pixel> = Vec::with_capacity(COLOURS_PER_PALETTE);
    for (_, _, pixel) in block_pixels(grid, tile_x, tile_y) {
        if !is_palette_colour(&pixel) || colours.contains(&pixel) {
            continue;
        }
        if colours.len() == COLOURS_PER_PALETTE {
            return Err(PackError::TooManyColors {
                tile_x,
                tile_y,
                colour: pixel.0,
            });
        }
        colours.push(pixel);
    }
    Ok(colours)
}

/// Encodes one tile against `palette`. Excluded pixels are written as index 0.
pub fn encode_tile(grid: &PixelGrid, tile_x: u32, tile_y: u32, palette: &Palette) -> Tile {
    let mut tile = Tile::default();
    for (x, row, pixel) in block_pixels(grid, tile_x, tile_y) {
        if !is_palette_colour(&pixel) {
            continue;
        }
        let slot = palette.slot_of(&pixel);
        debug_assert!(slot.is_some(), "committed palette is missing a tile colour");
        tile.set_index(x, row, slot.unwrap_or(0));
    }
    tile
}

/// Appends every tile of `grid` to `tables`, tile-column outer and tile-row inner.
///
/// Returns the number of tiles this sheet produced.
pub fn quantize_sheet(grid: &PixelGrid, tables: &mut TileTables) -> Result<usize> {
    if grid.width % TILE_DIM != 0 || grid.height % TILE_DIM != 0 {
        return Err(PackError::InvalidDimensions {
            width: grid.width,
            height: grid.height,
            reason: "sheet dimensions must be multiples of 8",
        });
    }

    let columns = grid.width / TILE_DIM;
    let rows = grid.height / TILE_DIM;
    let start = tables.tiles.len();

    for tile_x in 0..columns {
        for tile_y in 0..rows {
            if tables.tiles.len() >= MAX_TILES {
                return Err(PackError::TileTableFull);
            }

            let colours = collect_colours(grid, tile_x, tile_y)?;
            let palette_index = tables.palettes.commit(&colours)?;
            // The committed palette may order its slots differently from `colours`
            let palette = tables.palettes.as_slice()[palette_index];

            debug!(
                "tile ({}, {}): {} colours -> palette {}",
                tile_x,
                tile_y,
                colours.len(),
                palette_index
            );

            tables.tiles.push(encode_tile(grid, tile_x, tile_y, &palette));
            tables.tile_to_palette.push(palette_index as u32);
        }
    }

    Ok(tables.tiles.len() - start)
}
