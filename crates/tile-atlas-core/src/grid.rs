use crate::compositing::blit_centered;
use crate::error::{Result, TileAtlasError};
use crate::model::{AtlasLayout, CellSize, GridPos, NormalizedTile, Placement};
use image::RgbaImage;
use tracing::debug;

/// Assign each normalized tile a grid cell in sequence order:
/// `col = i % columns`, `row = i / columns`. Placements are unique, dense
/// and gap-free by construction.
pub fn place_tiles(tiles: &[NormalizedTile], columns: u32, cell: CellSize) -> Result<AtlasLayout> {
    if tiles.is_empty() {
        return Err(TileAtlasError::Empty);
    }
    let rows = (tiles.len() as u32).div_ceil(columns);
    let placements = tiles
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let pos = GridPos {
                col: i as u32 % columns,
                row: i as u32 / columns,
            };
            debug!(name = %t.name, col = pos.col, row = pos.row, "placed tile");
            Placement {
                name: t.name.clone(),
                origin: t.origin.clone(),
                pos,
            }
        })
        .collect();
    Ok(AtlasLayout {
        columns,
        rows,
        cell,
        placements,
    })
}

/// Composite the normalized tiles onto one transparent canvas according to
/// `layout`. A tile smaller than the cell (pad mode only) is centered within
/// its cell; split-mode tiles are always exactly cell-sized.
pub fn compose_atlas(tiles: &[NormalizedTile], layout: &AtlasLayout) -> RgbaImage {
    let cell = layout.cell;
    let mut canvas = RgbaImage::new(layout.width(), layout.height());
    for (tile, place) in tiles.iter().zip(&layout.placements) {
        blit_centered(
            &tile.rgba,
            &mut canvas,
            place.pos.col * cell.w,
            place.pos.row * cell.h,
            cell.w,
            cell.h,
        );
    }
    canvas
}
