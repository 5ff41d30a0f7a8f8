//! Error taxonomy shared by every stage of the packer.
//!
//! Every variant aborts the whole run. Tables produced by the pipeline are
//! positional, so skipping a single bad asset would shift every later index.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::tiles::{MAX_PALETTES, MAX_TILES};

#[derive(Debug, Error)]
pub enum PackError {
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("invalid dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        reason: &'static str,
    },

    #[error("tile ({tile_x}, {tile_y}) uses more than 4 colours (found a 5th: {colour:?})")]
    TooManyColors {
        tile_x: u32,
        tile_y: u32,
        colour: [u8; 4],
    },

    #[error("palette table full: more than {} distinct palettes needed", MAX_PALETTES)]
    PaletteTableFull,

    #[error("tile table full: more than {} tiles produced", MAX_TILES)]
    TileTableFull,

    #[error("sheet produced {actual} tiles but {expected} were declared")]
    TileCountMismatch { expected: usize, actual: usize },

    #[error("corrupt bundle: expected chunk '{expected}', found '{found}'")]
    CorruptBundle { expected: String, found: String },

    #[error("truncated bundle: {0}")]
    TruncatedBundle(String),

    #[error("invalid manifest: {0}")]
    Manifest(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{}: {source}", .path.display())]
    Asset {
        path: PathBuf,
        #[source]
        source: Box<PackError>,
    },
}

impl PackError {
    /// Attaches the asset being processed so the final message names it.
    pub fn in_asset(self, path: impl Into<PathBuf>) -> Self {
        PackError::Asset {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with any asset context peeled off.
    pub fn root(&self) -> &PackError {
        match self {
            PackError::Asset { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for PackError {
    fn from(err: serde_json::Error) -> Self {
        PackError::Manifest(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PackError>;
