//! Summaries of a loaded bundle for the `inspect` command.

use log::warn;
use serde::Serialize;

use crate::{
    bundle::Bundle,
    level::CellFlags,
    tiles::{MAX_PALETTES, MAX_TILES},
};

#[derive(Debug, Serialize)]
pub struct LevelSummary {
    pub index: usize,
    pub starting_pos: (f32, f32),
    pub top_blocks: usize,
    pub blocks: usize,
    pub ladders: usize,
    pub hazards: usize,
    pub boxes: usize,
}

#[derive(Debug, Serialize)]
pub struct BundleSummary {
    pub tiles: usize,
    pub palettes: Vec<[[u8; 4]; 4]>,
    pub tile_to_palette: Vec<u32>,
    pub levels: Vec<LevelSummary>,
}

impl BundleSummary {
    pub fn from_bundle(bundle: &Bundle) -> Self {
        BundleSummary {
            tiles: bundle.tiles.len(),
            palettes: bundle
                .palettes
                .iter()
                .map(|p| p.0.map(|colour| colour.0))
                .collect(),
            tile_to_palette: bundle.tile_to_palette.clone(),
            levels: bundle
                .levels
                .iter()
                .enumerate()
                .map(|(index, level)| LevelSummary {
                    index,
                    starting_pos: level.starting_pos,
                    top_blocks: level.count(CellFlags::TOP_BLOCK),
                    blocks: level.count(CellFlags::BLOCK),
                    ladders: level.count(CellFlags::LADDER),
                    hazards: level.count(CellFlags::HAZARD),
                    boxes: level.count(CellFlags::BOX),
                })
                .collect(),
        }
    }

    /// Problems the runtime would trip over. The reader itself accepts them.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.tiles > MAX_TILES {
            warnings.push(format!("{} tiles exceeds the {} tile limit", self.tiles, MAX_TILES));
        }
        if self.palettes.len() > MAX_PALETTES {
            warnings.push(format!(
                "{} palettes exceeds the {} palette limit",
                self.palettes.len(),
                MAX_PALETTES
            ));
        }
        if self.tile_to_palette.len() != self.tiles {
            warnings.push(format!(
                "tile map has {} entries for {} tiles",
                self.tile_to_palette.len(),
                self.tiles
            ));
        }
        if let Some(bad) = self
            .tile_to_palette
            .iter()
            .find(|&&p| p as usize >= self.palettes.len())
        {
            warnings.push(format!("tile map references missing palette {}", bad));
        }
        warnings
    }

    pub fn log_warnings(&self) {
        for warning in self.warnings() {
            warn!("{}", warning);
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = format!(
            "{} tiles, {} palettes, {} levels\n",
            self.tiles,
            self.palettes.len(),
            self.levels.len()
        );
        for (i, palette) in self.palettes.iter().enumerate() {
            let colours: Vec<String> = palette
                .iter()
                .map(|[r, g, b, a]| format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a))
                .collect();
            out.push_str(&format!("palette {}: {}\n", i, colours.join(" ")));
        }
        out.push_str(&format!("tile map: {:?}\n", self.tile_to_palette));
        for level in &self.levels {
            out.push_str(&format!(
                "level {}: start ({}, {}), {} top blocks, {} blocks, {} ladders, {} hazards, {} boxes\n",
                level.index,
                level.starting_pos.0,
                level.starting_pos.1,
                level.top_blocks,
                level.blocks,
                level.ladders,
                level.hazards,
                level.boxes
            ));
        }
        out
    }
}
