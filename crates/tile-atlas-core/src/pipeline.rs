use crate::config::BuildConfig;
use crate::error::{Result, TileAtlasError};
use crate::grid::{compose_atlas, place_tiles};
use crate::model::{AtlasLayout, BuildStats, NormalizedTile, SourceTile};
use crate::normalize::normalize;
use image::RgbaImage;
use tracing::{info, instrument};

/// Output of an atlas build: the composed RGBA image, the logical layout and
/// summary statistics. The descriptor is rendered separately from the layout
/// (see [`crate::tres::to_tres`]) so both artifacts derive from one source of
/// truth.
pub struct BuildOutput {
    pub rgba: RgbaImage,
    pub layout: AtlasLayout,
    pub stats: BuildStats,
}

#[instrument(skip_all)]
/// Build a fixed-grid atlas from decoded source tiles.
///
/// Stages run strictly in order, each consuming its input whole:
/// normalize (policy from `cfg`) -> place on the grid -> composite.
/// Empty input is fatal: there is no modal size and no cell size to derive.
pub fn build_atlas(tiles: Vec<SourceTile>, cfg: &BuildConfig) -> Result<BuildOutput> {
    cfg.validate()?;

    if tiles.is_empty() {
        return Err(TileAtlasError::Empty);
    }
    let num_sources = tiles.len();

    let (normalized, cell) = normalize(tiles, cfg)?;
    info!(
        tiles = normalized.len(),
        cell_w = cell.w,
        cell_h = cell.h,
        "normalized tiles"
    );

    let layout = place_tiles(&normalized, cfg.columns, cell)?;
    let rgba = compose_atlas(&normalized, &layout);

    let stats = BuildStats {
        num_sources,
        num_padded: normalized.iter().filter(|t| t.padded).count(),
        num_split: count_split_sources(&normalized),
        num_cells: layout.placements.len(),
        cell_size: (cell.w, cell.h),
        atlas_width: layout.width(),
        atlas_height: layout.height(),
        rows: layout.rows,
        columns: layout.columns,
    };
    info!(
        width = stats.atlas_width,
        height = stats.atlas_height,
        rows = stats.rows,
        columns = stats.columns,
        "composed atlas"
    );

    Ok(BuildOutput {
        rgba,
        layout,
        stats,
    })
}

/// Source tiles that expanded into more than one cell. Sub-tiles of one
/// source are contiguous in the normalized sequence, so a run count suffices.
fn count_split_sources(tiles: &[NormalizedTile]) -> usize {
    let mut split = 0;
    let mut i = 0;
    while i < tiles.len() {
        let mut j = i + 1;
        while j < tiles.len() && tiles[j].origin == tiles[i].origin {
            j += 1;
        }
        if j - i > 1 {
            split += 1;
        }
        i = j;
    }
    split
}
