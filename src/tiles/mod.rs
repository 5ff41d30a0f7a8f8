//! # Tiles and Palettes
//!
//! An 8x8 tile is stored as two 8-byte bitplanes. For the pixel in column `x` of bitplane row
//! `row`, bit `x` of `bit0[row]` and bit `x` of `bit1[row]` combine into a 2-bit index into the
//! tile's palette. Bitplane row 0 is the bottom scanline of the tile.

pub mod palette;
pub mod quantizer;

use crate::pixel::{Pixel, ZERO_PIXEL};

pub use palette::PaletteTable;
pub use quantizer::{quantize_sheet, TileTables};

pub const TILE_DIM: u32 = 8;
pub const COLOURS_PER_PALETTE: usize = 4;

/// The renderer addresses palettes with a 3-bit field.
pub const MAX_PALETTES: usize = 8;
/// The renderer addresses tiles with an 8-bit index.
pub const MAX_TILES: usize = 256;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tile {
    pub bit0: [u8; 8],
    pub bit1: [u8; 8],
}

impl Tile {
    pub fn set_index(&mut self, x: u32, row: u32, index: u8) {
        let mask = 1u8 << x;
        let row = row as usize;
        if index & 1 != 0 {
            self.bit0[row] |= mask;
        } else {
            self.bit0[row] &= !mask;
        }
        if index & 2 != 0 {
            self.bit1[row] |= mask;
        } else {
            self.bit1[row] &= !mask;
        }
    }

    pub fn index_at(&self, x: u32, row: u32) -> u8 {
        let row = row as usize;
        let lo = (self.bit0[row] >> x) & 1;
        let hi = (self.bit1[row] >> x) & 1;
        (hi << 1) | lo
    }

    /// Decode into 64 palette indices, bitplane row-major.
    pub fn decode(&self) -> [u8; 64] {
        let mut indices = [0u8; 64];
        for row in 0..TILE_DIM {
            for x in 0..TILE_DIM {
                indices[(row * TILE_DIM + x) as usize] = self.index_at(x, row);
            }
        }
        indices
    }
}

/// Four colour slots. Unused slots hold [`ZERO_PIXEL`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette(pub [Pixel; COLOURS_PER_PALETTE]);

impl Default for Palette {
    fn default() -> Self {
        Palette([ZERO_PIXEL; COLOURS_PER_PALETTE])
    }
}

impl Palette {
    /// Builds a palette holding `colours` in order, padded with the zero pixel.
    pub fn from_colours(colours: &[Pixel]) -> Self {
        debug_assert!(colours.len() <= COLOURS_PER_PALETTE);
        let mut palette = Palette::default();
        for (slot, colour) in palette.0.iter_mut().zip(colours) {
            *slot = *colour;
        }
        palette
    }

    /// Slot holding `colour`, if any. Compares against all four slots.
    pub fn slot_of(&self, colour: &Pixel) -> Option<u8> {
        self.0.iter().position(|c| c == colour).map(|i| i as u8)
    }

    /// True when every colour in `colours` sits in one of the four slots, in any order.
    pub fn contains_all(&self, colours: &[Pixel]) -> bool {
        colours.iter().all(|c| self.slot_of(c).is_some())
    }
}
