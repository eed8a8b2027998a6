use image::RgbaImage;

/// Blit a sub-rectangle from `src` into `canvas` at destination (dx, dy).
///
/// - (sx, sy, sw, sh): source rectangle within `src`
/// - (dx, dy): destination top-left in `canvas`
///
/// Pixels falling outside either image are skipped, so callers may pass
/// rectangles clipped to the source bounds without pre-checking the canvas.
#[allow(clippy::too_many_arguments)]
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32, sx: u32, sy: u32, sw: u32, sh: u32) {
    let (cw, ch) = canvas.dimensions();
    let (iw, ih) = src.dimensions();
    for yy in 0..sh {
        for xx in 0..sw {
            if sx + xx >= iw || sy + yy >= ih {
                continue;
            }
            if dx + xx < cw && dy + yy < ch {
                let px = *src.get_pixel(sx + xx, sy + yy);
                canvas.put_pixel(dx + xx, dy + yy, px);
            }
        }
    }
}

/// Blit the whole of `src` into `canvas`, centered at the cell whose top-left
/// is (cx, cy) and whose extent is (cell_w, cell_h). When `src` is smaller
/// than the cell in an axis the slack splits evenly, rounding the margin down
/// on the top/left side.
pub fn blit_centered(src: &RgbaImage, canvas: &mut RgbaImage, cx: u32, cy: u32, cell_w: u32, cell_h: u32) {
    let (sw, sh) = src.dimensions();
    let dx = cx + cell_w.saturating_sub(sw) / 2;
    let dy = cy + cell_h.saturating_sub(sh) / 2;
    blit_rgba(src, canvas, dx, dy, 0, 0, sw, sh);
}

/// Composite `src` centered onto a fresh transparent canvas of (w, h).
pub fn pad_centered(src: &RgbaImage, w: u32, h: u32) -> RgbaImage {
    let mut canvas = RgbaImage::new(w, h);
    blit_centered(src, &mut canvas, 0, 0, w, h);
    canvas
}

/// Copy the (sx, sy, sw, sh) region of `src`, clipped to the source bounds,
/// centered onto a transparent (w, h) canvas. Used for the remainder row and
/// column of a split tile.
pub fn crop_padded(src: &RgbaImage, sx: u32, sy: u32, sw: u32, sh: u32, w: u32, h: u32) -> RgbaImage {
    let (iw, ih) = src.dimensions();
    let cw = sw.min(iw.saturating_sub(sx));
    let ch = sh.min(ih.saturating_sub(sy));
    let mut canvas = RgbaImage::new(w, h);
    let dx = w.saturating_sub(cw) / 2;
    let dy = h.saturating_sub(ch) / 2;
    blit_rgba(src, &mut canvas, dx, dy, sx, sy, cw, ch);
    canvas
}
