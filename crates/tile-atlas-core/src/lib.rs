//! Core library for building fixed-grid tile atlases.
//!
//! - Normalization: pad-to-mode (grow small tiles to the modal size) or
//!   fixed-cell split (carve oversized tiles into cell-sized pieces)
//! - Placement: deterministic row-major grid, fixed column count
//! - Output: one RGBA atlas image plus a Godot TileSet (`.tres`) descriptor
//!   that stays consistent with it, both derived from a single `AtlasLayout`
//!
//! Quick example:
//! ```ignore
//! use image::ImageReader;
//! use tile_atlas_core::{BuildConfig, SourceTile, build_atlas, to_tres};
//! # fn main() -> anyhow::Result<()> {
//! let img = ImageReader::open("grass.png")?.decode()?.to_rgba8();
//! let tiles = vec![SourceTile::new("grass", img)];
//! let out = build_atlas(tiles, &BuildConfig::default())?;
//! let descriptor = to_tres("res://tiles/atlas.png", &out.layout);
//! println!("{}", out.stats.summary());
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod tres;

pub use config::*;
pub use error::*;
pub use export::*;
pub use grid::*;
pub use model::*;
pub use normalize::*;
pub use pipeline::*;
pub use tres::*;

/// Convenience prelude for common types and functions.
/// Importing `tile_atlas_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{BuildConfig, BuildConfigBuilder, NormalizePolicy};
    pub use crate::model::{
        AtlasLayout, BuildStats, CellSize, GridPos, NormalizedTile, Placement, SourceTile,
    };
    pub use crate::pipeline::{BuildOutput, build_atlas};
    pub use crate::tres::{GdDocument, GdSection, tileset_document, to_tres};
    pub use crate::{to_json_layout, TileAtlasError};
}
