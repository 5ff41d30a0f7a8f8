//! Packs sprite sheets and level images into the binary asset bundle read by a 4-colour
//! tile/sprite renderer.

pub mod binary_utils;
pub mod bundle;
pub mod chunk;
pub mod error;
pub mod level;
pub mod manifest;
pub mod packer;
pub mod pixel;
pub mod preview;
pub mod progress;
pub mod report;
pub mod tiles;

pub use bundle::Bundle;
pub use error::{PackError, Result};
pub use packer::AssetPacker;
