use image::{Rgba, RgbaImage};
use tile_atlas_core::config::{BuildConfig, NormalizePolicy};
use tile_atlas_core::model::SourceTile;
use tile_atlas_core::normalize::normalize;

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba(rgba))
}

fn split_cfg(cell: u32) -> BuildConfig {
    BuildConfig {
        policy: NormalizePolicy::SplitFixedCell,
        cell_size: cell,
        ..Default::default()
    }
}

#[test]
fn exact_multiple_splits_without_padding() {
    // 140x70 at cell 70: two 70x70 sub-tiles, no padding anywhere.
    let mut img = RgbaImage::new(140, 70);
    for y in 0..70 {
        for x in 0..140 {
            let px = if x < 70 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            };
            img.put_pixel(x, y, px);
        }
    }
    let tiles = vec![SourceTile::new("wide", img)];
    let (out, cell) = normalize(tiles, &split_cfg(70)).expect("normalize");

    assert_eq!((cell.w, cell.h), (70, 70));
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].name, "wide_0_0");
    assert_eq!(out[1].name, "wide_0_1");
    assert!(out.iter().all(|t| !t.padded));
    assert!(out.iter().all(|t| t.rgba.dimensions() == (70, 70)));
    // Left half is entirely red, right half entirely blue.
    assert!(out[0].rgba.pixels().all(|p| *p == Rgba([255, 0, 0, 255])));
    assert!(out[1].rgba.pixels().all(|p| *p == Rgba([0, 0, 255, 255])));
}

#[test]
fn undersized_tile_is_centered_in_one_cell() {
    // 70x50 at cell 70: one tile, 10px transparent margin top and bottom.
    let tiles = vec![SourceTile::new("low", solid(70, 50, [0, 255, 0, 255]))];
    let (out, _) = normalize(tiles, &split_cfg(70)).expect("normalize");

    assert_eq!(out.len(), 1);
    let t = &out[0];
    assert_eq!(t.name, "low");
    assert!(t.padded);
    assert_eq!(t.rgba.dimensions(), (70, 70));
    assert_eq!(t.rgba.get_pixel(0, 0)[3], 0);
    assert_eq!(t.rgba.get_pixel(0, 9)[3], 0);
    assert_eq!(*t.rgba.get_pixel(0, 10), Rgba([0, 255, 0, 255]));
    assert_eq!(*t.rgba.get_pixel(69, 59), Rgba([0, 255, 0, 255]));
    assert_eq!(t.rgba.get_pixel(0, 60)[3], 0);
    assert_eq!(t.rgba.get_pixel(69, 69)[3], 0);
}

#[test]
fn exactly_cell_sized_tile_passes_through() {
    // Ceiling division boundary: size == cell stays whole and untouched.
    let img = solid(70, 70, [9, 9, 9, 255]);
    let tiles = vec![SourceTile::new("exact", img.clone())];
    let (out, _) = normalize(tiles, &split_cfg(70)).expect("normalize");
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].name, "exact");
    assert!(!out[0].padded);
    assert_eq!(out[0].rgba.as_raw(), img.as_raw());
}

#[test]
fn one_pixel_over_cell_splits() {
    // 71 wide at cell 70: two columns; the remainder column is clipped to
    // 1px of content and centered up to the cell.
    let tiles = vec![SourceTile::new("over", solid(71, 70, [50, 60, 70, 255]))];
    let (out, _) = normalize(tiles, &split_cfg(70)).expect("normalize");
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].name, "over_0_0");
    assert_eq!(out[1].name, "over_0_1");
    assert!(!out[0].padded);
    assert!(out[1].padded);
    assert_eq!(out[1].rgba.dimensions(), (70, 70));
    // 1px remainder centered horizontally: (70 - 1) / 2 = 34.
    assert_eq!(out[1].rgba.get_pixel(33, 35)[3], 0);
    assert_eq!(*out[1].rgba.get_pixel(34, 35), Rgba([50, 60, 70, 255]));
    assert_eq!(out[1].rgba.get_pixel(35, 35)[3], 0);
}

#[test]
fn sub_tiles_scan_row_major() {
    // 140x140 at cell 70: four sub-tiles in row-major order.
    let tiles = vec![SourceTile::new("quad", solid(140, 140, [1, 1, 1, 255]))];
    let (out, _) = normalize(tiles, &split_cfg(70)).expect("normalize");
    let names: Vec<&str> = out.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["quad_0_0", "quad_0_1", "quad_1_0", "quad_1_1"]);
}

#[test]
fn sub_tiles_expand_in_place() {
    let tiles = vec![
        SourceTile::new("a", solid(10, 10, [1, 0, 0, 255])),
        SourceTile::new("b", solid(150, 10, [0, 1, 0, 255])),
        SourceTile::new("c", solid(10, 10, [0, 0, 1, 255])),
    ];
    let (out, _) = normalize(tiles, &split_cfg(70)).expect("normalize");
    let names: Vec<&str> = out.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b_0_0", "b_0_1", "b_0_2", "c"]);
    assert_eq!(out[1].origin, "b");
    assert_eq!(out[3].origin, "b");
}
