use crate::compositing::{crop_padded, pad_centered};
use crate::config::{BuildConfig, NormalizePolicy};
use crate::error::{Result, TileAtlasError};
use crate::model::{CellSize, NormalizedTile, SourceTile};
use std::collections::HashMap;
use tracing::debug;

/// Modal (width, height) pair over the source tiles, ties broken by
/// first-encountered size.
pub fn modal_size(tiles: &[SourceTile]) -> Option<(u32, u32)> {
    let mut counts: HashMap<(u32, u32), usize> = HashMap::new();
    let mut order: Vec<(u32, u32)> = Vec::new();
    for t in tiles {
        let size = t.image.dimensions();
        let entry = counts.entry(size).or_insert(0);
        if *entry == 0 {
            order.push(size);
        }
        *entry += 1;
    }
    // Scan in encounter order so the first-seen size wins a tied count.
    let mut best: Option<((u32, u32), usize)> = None;
    for size in order {
        let n = counts[&size];
        match best {
            Some((_, bn)) if bn >= n => {}
            _ => best = Some((size, n)),
        }
    }
    best.map(|(size, _)| size)
}

/// Normalize `tiles` to a common cell size under the configured policy.
/// Returns the normalized sequence (source order, sub-tiles expanded in
/// place) and the uniform cell size.
pub fn normalize(tiles: Vec<SourceTile>, cfg: &BuildConfig) -> Result<(Vec<NormalizedTile>, CellSize)> {
    cfg.validate()?;
    if tiles.is_empty() {
        return Err(TileAtlasError::Empty);
    }
    match cfg.policy {
        NormalizePolicy::PadToMode => pad_to_mode(tiles),
        NormalizePolicy::SplitFixedCell => split_fixed_cell(tiles, cfg.cell_size),
    }
}

/// Pad-to-minimum policy. Two explicit passes: the modal size decides which
/// tiles get padded, the cell size is the maximum over the post-pass tiles.
fn pad_to_mode(tiles: Vec<SourceTile>) -> Result<(Vec<NormalizedTile>, CellSize)> {
    let (mode_w, mode_h) = modal_size(&tiles).ok_or(TileAtlasError::Empty)?;
    debug!(mode_w, mode_h, "modal tile size");

    let mut out = Vec::with_capacity(tiles.len());
    for t in tiles {
        let (w, h) = t.image.dimensions();
        if w < mode_w || h < mode_h {
            // Canvas never crops: a tile below the mode in one axis but above
            // it in the other keeps its larger dimension.
            let (cw, ch) = (w.max(mode_w), h.max(mode_h));
            debug!(name = %t.name, from = format!("{w}x{h}"), to = format!("{cw}x{ch}"), "padded tile");
            out.push(NormalizedTile {
                name: t.name.clone(),
                rgba: pad_centered(&t.image, cw, ch),
                origin: t.name,
                padded: true,
            });
        } else {
            debug!(name = %t.name, size = format!("{w}x{h}"), "kept tile");
            out.push(NormalizedTile {
                name: t.name.clone(),
                rgba: t.image,
                origin: t.name,
                padded: false,
            });
        }
    }

    let cell_w = out.iter().map(|t| t.rgba.width()).max().unwrap_or(0);
    let cell_h = out.iter().map(|t| t.rgba.height()).max().unwrap_or(0);
    Ok((out, CellSize::new(cell_w, cell_h)))
}

/// Fixed-cell-split policy. Tiles that fit a cell are centered into one;
/// larger tiles are carved row-major into cell-sized pieces, with remainder
/// regions clipped to the source bounds and centered up to the cell.
fn split_fixed_cell(tiles: Vec<SourceTile>, cell: u32) -> Result<(Vec<NormalizedTile>, CellSize)> {
    let mut out = Vec::with_capacity(tiles.len());
    for t in tiles {
        let (w, h) = t.image.dimensions();
        let cols = w.div_ceil(cell);
        let rows = h.div_ceil(cell);
        if cols <= 1 && rows <= 1 {
            if w < cell || h < cell {
                debug!(name = %t.name, from = format!("{w}x{h}"), cell, "padded tile to cell");
                out.push(NormalizedTile {
                    name: t.name.clone(),
                    rgba: pad_centered(&t.image, cell, cell),
                    origin: t.name,
                    padded: true,
                });
            } else {
                // Exactly cell-sized in both axes; carried through unchanged.
                out.push(NormalizedTile {
                    name: t.name.clone(),
                    rgba: t.image,
                    origin: t.name,
                    padded: false,
                });
            }
        } else {
            debug!(name = %t.name, size = format!("{w}x{h}"), rows, cols, "split tile");
            for row in 0..rows {
                for col in 0..cols {
                    let sx = col * cell;
                    let sy = row * cell;
                    let clipped = (w - sx) < cell || (h - sy) < cell;
                    out.push(NormalizedTile {
                        name: format!("{}_{}_{}", t.name, row, col),
                        rgba: crop_padded(&t.image, sx, sy, cell, cell, cell, cell),
                        origin: t.name.clone(),
                        padded: clipped,
                    });
                }
            }
        }
    }
    Ok((out, CellSize::new(cell, cell)))
}
