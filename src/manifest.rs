//! # Packing Manifest
//!
//! Lists the sprite sheets and level images that go into a bundle:
//!
//! ```json
//! {
//!   "sheets": [
//!     { "path": "tiles/Boxes.png", "width": 48, "height": 16, "tiles": 12 },
//!     { "path": "tiles/Cats.png", "width": 16, "height": 32 }
//!   ],
//!   "levels": ["levels/1.png", "levels/2.png"],
//!   "output": "tiles.bin"
//! }
//! ```
//!
//! Relative paths resolve against the directory holding the manifest.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    error::{PackError, Result},
    pixel::Origin,
};

pub const DEFAULT_OUTPUT: &str = "tiles.bin";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SheetEntry {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Expected tile count, checked after quantizing when present.
    #[serde(default)]
    pub tiles: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub sheets: Vec<SheetEntry>,
    #[serde(default)]
    pub levels: Vec<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub sheet_origin: Origin,
    #[serde(default = "default_level_origin")]
    pub level_origin: Origin,
}

fn default_level_origin() -> Origin {
    Origin::BottomLeft
}

impl Manifest {
    pub fn from_json(text: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(text)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Loads a manifest and resolves its relative paths against the manifest's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let manifest = Self::from_json(&text).map_err(|e| e.in_asset(path))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(manifest.resolve(base))
    }

    pub fn validate(&self) -> Result<()> {
        if self.sheets.is_empty() {
            return Err(PackError::Manifest("no sprite sheets listed".to_string()));
        }
        for sheet in &self.sheets {
            if sheet.width == 0 || sheet.height == 0 {
                return Err(PackError::Manifest(format!(
                    "{} has a zero dimension ({}x{})",
                    sheet.path.display(),
                    sheet.width,
                    sheet.height
                )));
            }
        }
        Ok(())
    }

    pub fn resolve(mut self, base: &Path) -> Self {
        for sheet in &mut self.sheets {
            sheet.path = base.join(&sheet.path);
        }
        for level in &mut self.levels {
            *level = base.join(&*level);
        }
        self.output = self.output.map(|output| base.join(output));
        self
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }
}
