use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Uniform cell dimensions shared by every normalized tile and the atlas grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellSize {
    pub w: u32,
    pub h: u32,
}

impl CellSize {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

/// Grid coordinates of a placed tile. `col` runs left-to-right, `row` top-to-bottom.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub col: u32,
    pub row: u32,
}

/// A decoded source tile. Identity is the source file stem.
pub struct SourceTile {
    pub name: String,
    pub image: RgbaImage,
}

impl SourceTile {
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }
}

/// A tile brought to the common cell size by a normalization policy.
///
/// In split mode one source tile yields 1..N of these, named
/// `<stem>_<row>_<col>`; in pad mode exactly one with the name unchanged.
/// `padded` records whether a transparent canvas was introduced; it is
/// diagnostic only and never affects placement.
pub struct NormalizedTile {
    pub name: String,
    pub rgba: RgbaImage,
    /// Source tile this was derived from.
    pub origin: String,
    pub padded: bool,
}

/// A single occupied cell in the atlas grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Placement {
    /// Derived tile name (source stem, or `<stem>_<row>_<col>` for sub-tiles).
    pub name: String,
    /// Source tile the cell content came from.
    pub origin: String,
    pub pos: GridPos,
}

/// Logical layout of the composed atlas: grid shape, cell size and the
/// ordered placement list. Placements are dense: entry `i` sits at
/// `(i % columns, i / columns)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasLayout {
    pub columns: u32,
    pub rows: u32,
    pub cell: CellSize,
    pub placements: Vec<Placement>,
}

impl AtlasLayout {
    /// Pixel width of the composed atlas image.
    pub fn width(&self) -> u32 {
        self.columns * self.cell.w
    }

    /// Pixel height of the composed atlas image.
    pub fn height(&self) -> u32 {
        self.rows * self.cell.h
    }
}

/// Statistics about a build, for operator visibility.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BuildStats {
    /// Source tiles that entered normalization.
    pub num_sources: usize,
    /// Tiles that were centered onto a transparent canvas.
    pub num_padded: usize,
    /// Source tiles partitioned into multiple sub-tiles (split mode).
    pub num_split: usize,
    /// Occupied grid cells (= normalized tile count).
    pub num_cells: usize,
    pub cell_size: (u32, u32),
    pub atlas_width: u32,
    pub atlas_height: u32,
    pub rows: u32,
    pub columns: u32,
}

impl BuildStats {
    /// Fraction of grid cells that hold a tile (the last row is rarely full).
    pub fn grid_occupancy(&self) -> f64 {
        let total = (self.columns as u64) * (self.rows as u64);
        if total > 0 {
            self.num_cells as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Sources: {}, Cells: {}, Padded: {}, Split: {}, Cell: {}x{}, Atlas: {}x{} ({}x{} grid, {:.2}% occupied)",
            self.num_sources,
            self.num_cells,
            self.num_padded,
            self.num_split,
            self.cell_size.0,
            self.cell_size.1,
            self.atlas_width,
            self.atlas_height,
            self.columns,
            self.rows,
            self.grid_occupancy() * 100.0,
        )
    }
}
