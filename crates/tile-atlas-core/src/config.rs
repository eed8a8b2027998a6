use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Size normalization policies.
///
/// The two policies are mutually exclusive: `PadToMode` grows small tiles up
/// to the modal source size and lets larger tiles pass through, producing a
/// cell size known only after the pass; `SplitFixedCell` fixes the cell size
/// up front and carves oversized tiles into cell-sized pieces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NormalizePolicy {
    /// Pad tiles smaller than the modal size; cell size = max tile size after the pass.
    PadToMode,
    /// Fixed `cell_size`; tiles larger than a cell are split row-major into sub-tiles.
    SplitFixedCell,
}

impl FromStr for NormalizePolicy {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pad" | "pad_to_mode" => Ok(Self::PadToMode),
            "split" | "split_fixed_cell" => Ok(Self::SplitFixedCell),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Fixed number of grid columns.
    #[serde(default = "default_columns")]
    pub columns: u32,
    /// Normalization policy.
    #[serde(default = "default_policy")]
    pub policy: NormalizePolicy,
    /// Cell edge length in pixels, used by `SplitFixedCell` only.
    #[serde(default = "default_cell_size")]
    pub cell_size: u32,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            policy: default_policy(),
            cell_size: default_cell_size(),
        }
    }
}

impl BuildConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::TileAtlasError;

        if self.columns == 0 {
            return Err(TileAtlasError::InvalidConfig(
                "columns must be at least 1".into(),
            ));
        }
        if matches!(self.policy, NormalizePolicy::SplitFixedCell) && self.cell_size == 0 {
            return Err(TileAtlasError::InvalidConfig(
                "cell_size must be at least 1 in split mode".into(),
            ));
        }
        Ok(())
    }

    /// Create a fluent builder for `BuildConfig`.
    pub fn builder() -> BuildConfigBuilder {
        BuildConfigBuilder::new()
    }
}

fn default_columns() -> u32 {
    16
}
fn default_policy() -> NormalizePolicy {
    NormalizePolicy::PadToMode
}
fn default_cell_size() -> u32 {
    70
}

/// Builder for `BuildConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct BuildConfigBuilder {
    cfg: BuildConfig,
}

impl BuildConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: BuildConfig::default(),
        }
    }
    pub fn columns(mut self, v: u32) -> Self {
        self.cfg.columns = v;
        self
    }
    pub fn policy(mut self, v: NormalizePolicy) -> Self {
        self.cfg.policy = v;
        self
    }
    pub fn cell_size(mut self, v: u32) -> Self {
        self.cfg.cell_size = v;
        self
    }
    pub fn build(self) -> BuildConfig {
        self.cfg
    }
}
