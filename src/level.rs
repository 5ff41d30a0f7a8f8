//! # Level Encoder
//!
//! A level is a 16x15 grid of cells painted one pixel per cell. The colour of each pixel says what
//! lives in that cell:
//!
//! | RGB           | Meaning        |
//! |---------------|----------------|
//! | `000000`      | player start   |
//! | `00FF00`      | top block      |
//! | `FFFF00`      | block          |
//! | `0000FF`      | ladder         |
//! | `FF0000`      | hazard         |
//! | `FF00FF`      | box spawn      |
//!
//! Only fully opaque pixels match. Transparent pixels and colours outside the legend leave the cell
//! empty.

use std::ops::{BitOr, BitOrAssign};

use log::{debug, warn};

use crate::{
    error::{PackError, Result},
    pixel::{Pixel, PixelGrid},
};

pub const LEVEL_WIDTH: usize = 16;
pub const LEVEL_HEIGHT: usize = 15;

/// Grid units to movement units.
pub const START_SCALE: f32 = 2.0;
pub const DEFAULT_START: (f32, f32) = (0.0, 4.0);

/// What occupies a single level cell. Several flags may be set at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellFlags(u8);

impl CellFlags {
    pub const EMPTY: CellFlags = CellFlags(0);
    pub const TOP_BLOCK: CellFlags = CellFlags(1 << 0);
    pub const BLOCK: CellFlags = CellFlags(1 << 1);
    pub const LADDER: CellFlags = CellFlags(1 << 2);
    pub const HAZARD: CellFlags = CellFlags(1 << 3);
    pub const BOX: CellFlags = CellFlags(1 << 4);

    /// On-disk grid order.
    pub const ALL: [CellFlags; 5] = [
        CellFlags::TOP_BLOCK,
        CellFlags::BLOCK,
        CellFlags::LADDER,
        CellFlags::HAZARD,
        CellFlags::BOX,
    ];

    pub fn contains(self, other: CellFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for CellFlags {
    type Output = CellFlags;

    fn bitor(self, rhs: CellFlags) -> CellFlags {
        CellFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for CellFlags {
    fn bitor_assign(&mut self, rhs: CellFlags) {
        self.0 |= rhs.0;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LegendEntry {
    Start,
    Cell(CellFlags),
}

fn classify(pixel: &Pixel) -> Option<LegendEntry> {
    let [r, g, b, a] = pixel.0;
    if a != 0xFF {
        return None;
    }
    match (r, g, b) {
        (0x00, 0x00, 0x00) => Some(LegendEntry::Start),
        (0x00, 0xFF, 0x00) => Some(LegendEntry::Cell(CellFlags::TOP_BLOCK)),
        (0xFF, 0xFF, 0x00) => Some(LegendEntry::Cell(CellFlags::BLOCK)),
        (0x00, 0x00, 0xFF) => Some(LegendEntry::Cell(CellFlags::LADDER)),
        (0xFF, 0x00, 0x00) => Some(LegendEntry::Cell(CellFlags::HAZARD)),
        (0xFF, 0x00, 0xFF) => Some(LegendEntry::Cell(CellFlags::BOX)),
        _ => None,
    }
}

/// Indexed `cells[x][y]`, y = 0 at the bottom row.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub cells: [[CellFlags; LEVEL_HEIGHT]; LEVEL_WIDTH],
    pub starting_pos: (f32, f32),
}

impl Default for Level {
    fn default() -> Self {
        Level {
            cells: [[CellFlags::EMPTY; LEVEL_HEIGHT]; LEVEL_WIDTH],
            starting_pos: DEFAULT_START,
        }
    }
}

impl Level {
    pub fn cell(&self, x: usize, y: usize) -> CellFlags {
        self.cells[x][y]
    }

    /// Number of cells carrying `flag`.
    pub fn count(&self, flag: CellFlags) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.contains(flag))
            .count()
    }

    /// Decodes a 16x15 level grid. Row 0 of `grid` is taken as level row 0.
    pub fn decode(grid: &PixelGrid) -> Result<Self> {
        if grid.width as usize != LEVEL_WIDTH || grid.height as usize != LEVEL_HEIGHT {
            return Err(PackError::InvalidDimensions {
                width: grid.width,
                height: grid.height,
                reason: "levels must be 16x15",
            });
        }

        let mut level = Level::default();
        let mut start_found = false;
        let mut ignored = 0usize;

        for x in 0..LEVEL_WIDTH {
            for y in 0..LEVEL_HEIGHT {
                let pixel = grid.get(x as u32, y as u32);
                match classify(&pixel) {
                    Some(LegendEntry::Start) => {
                        if start_found {
                            warn!("more than one start cell; using ({}, {})", x, y);
                        }
                        start_found = true;
                        level.starting_pos = (x as f32 * START_SCALE, y as f32 * START_SCALE);
                    }
                    Some(LegendEntry::Cell(flag)) => level.cells[x][y] |= flag,
                    None if pixel.0[3] != 0 => ignored += 1,
                    None => {}
                }
            }
        }

        if !start_found {
            debug!("no start cell, using default {:?}", DEFAULT_START);
        }
        if ignored > 0 {
            debug!("{} cells had colours outside the legend", ignored);
        }

        Ok(level)
    }
}
