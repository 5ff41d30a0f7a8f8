//! # Bundle Assembler
//!
//! Runs the whole pipeline for one manifest: every sprite sheet through the reader and quantizer
//! (sharing one palette table), every level image through the level encoder, then the four tables
//! into a bundle. Nothing is written until every asset has been processed.

use std::path::Path;

use log::info;

use crate::{
    bundle::Bundle,
    error::{PackError, Result},
    level::{Level, LEVEL_HEIGHT, LEVEL_WIDTH},
    manifest::{Manifest, SheetEntry},
    pixel::read_pixels,
    progress::ProgressFile,
    tiles::{quantize_sheet, TileTables},
};

pub struct AssetPacker {
    manifest: Manifest,
}

impl AssetPacker {
    pub fn new(manifest: Manifest) -> Self {
        AssetPacker { manifest }
    }

    pub fn from_manifest_path(path: &Path) -> Result<Self> {
        Ok(AssetPacker::new(Manifest::load(path)?))
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Builds the bundle in memory.
    pub fn pack(&self, progress: &mut ProgressFile) -> Result<Bundle> {
        let mut tables = TileTables::new();
        for sheet in &self.manifest.sheets {
            self.pack_sheet(sheet, &mut tables)
                .map_err(|e| e.in_asset(&sheet.path))?;
            progress.advance("sheets");
        }

        let mut levels = Vec::with_capacity(self.manifest.levels.len());
        for path in &self.manifest.levels {
            levels.push(self.pack_level(path).map_err(|e| e.in_asset(path))?);
            progress.advance("levels");
        }

        let bundle = Bundle {
            tiles: tables.tiles,
            palettes: tables.palettes.into_vec(),
            tile_to_palette: tables.tile_to_palette,
            levels,
        };

        info!(
            "created {} tiles, {} palettes, and {} levels",
            bundle.tiles.len(),
            bundle.palettes.len(),
            bundle.levels.len()
        );
        Ok(bundle)
    }

    /// Packs everything and writes the bundle to `output`. On failure no bundle is written.
    pub fn pack_to_file(&self, output: &Path, progress_path: Option<&Path>) -> Result<Bundle> {
        let total = self.manifest.sheets.len() + self.manifest.levels.len();
        let mut progress = ProgressFile::new(progress_path, total);

        let result = self
            .pack(&mut progress)
            .and_then(|bundle| bundle.write(output).map(|_| bundle));

        progress.finish(result.is_ok());
        result
    }

    fn pack_sheet(&self, sheet: &SheetEntry, tables: &mut TileTables) -> Result<usize> {
        info!("loading {}", sheet.path.display());
        let (grid, _) = read_pixels(
            &sheet.path,
            (sheet.width, sheet.height),
            self.manifest.sheet_origin,
        )?;

        let produced = quantize_sheet(&grid, tables)?;
        if let Some(expected) = sheet.tiles {
            if expected != produced {
                return Err(PackError::TileCountMismatch {
                    expected,
                    actual: produced,
                });
            }
        }

        info!(
            "  {} tiles, {} palettes so far",
            produced,
            tables.palettes.len()
        );
        Ok(produced)
    }

    fn pack_level(&self, path: &Path) -> Result<Level> {
        info!("loading {}", path.display());
        let (grid, _) = read_pixels(
            path,
            (LEVEL_WIDTH as u32, LEVEL_HEIGHT as u32),
            self.manifest.level_origin,
        )?;
        Level::decode(&grid)
    }
}
