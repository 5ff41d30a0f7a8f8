//! # Pixel Source Reader
//!
//! Decodes an image into a rectangular grid of RGBA pixels. Row 0 of the grid is either the top
//! or the bottom scanline of the image depending on the requested [`Origin`], and the grid keeps
//! that origin so every consumer can read rows in the same direction.

use std::path::Path;

use image::{Rgba, RgbaImage};
use serde::Deserialize;

use crate::error::{PackError, Result};

/// Four 8-bit channels. Equal only when all four channels match.
pub type Pixel = Rgba<u8>;

pub const ZERO_PIXEL: Pixel = Rgba([0, 0, 0, 0]);

/// Which scanline of the source image becomes row 0 of a [`PixelGrid`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    #[default]
    TopLeft,
    BottomLeft,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PixelGrid {
    pub width: u32,
    pub height: u32,
    pub origin: Origin,
    pixels: Vec<Pixel>,
}

impl PixelGrid {
    /// Pixel at column `x`, row `y` in this grid's own row order.
    pub fn get(&self, x: u32, y: u32) -> Pixel {
        self.pixels[(x + self.width * y) as usize]
    }

    /// Builds a grid covering the `declared` region of `image`, anchored at the corner the origin
    /// names (top-left or bottom-left).
    pub fn from_image(image: &RgbaImage, declared: (u32, u32), origin: Origin) -> Result<Self> {
        let (actual_w, actual_h) = image.dimensions();
        let (width, height) = declared;

        if actual_w < width || actual_h < height {
            return Err(PackError::Decode(format!(
                "image is {}x{}, smaller than the declared {}x{}",
                actual_w, actual_h, width, height
            )));
        }

        let mut pixels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            let src_y = match origin {
                Origin::TopLeft => y,
                Origin::BottomLeft => actual_h - 1 - y,
            };
            for x in 0..width {
                pixels.push(*image.get_pixel(x, src_y));
            }
        }

        Ok(PixelGrid {
            width,
            height,
            origin,
            pixels,
        })
    }
}

/// Reads the image at `path` into a grid of the declared size.
///
/// Returns the grid together with the image's actual dimensions.
pub fn read_pixels(
    path: &Path,
    declared: (u32, u32),
    origin: Origin,
) -> Result<(PixelGrid, (u32, u32))> {
    let image = image::open(path)
        .map_err(|e| PackError::Decode(format!("{}: {}", path.display(), e)))?
        .to_rgba8();
    let actual = image.dimensions();
    let grid = PixelGrid::from_image(&image, declared, origin)?;
    Ok((grid, actual))
}
