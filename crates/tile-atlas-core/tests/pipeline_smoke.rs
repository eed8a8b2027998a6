use image::{Rgba, RgbaImage};
use tile_atlas_core::config::{BuildConfig, NormalizePolicy};
use tile_atlas_core::error::TileAtlasError;
use tile_atlas_core::export::to_json_layout;
use tile_atlas_core::model::SourceTile;
use tile_atlas_core::pipeline::build_atlas;
use tile_atlas_core::tres::to_tres;

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba(rgba))
}

fn sample_tiles() -> Vec<SourceTile> {
    vec![
        SourceTile::new("grass", solid(16, 16, [0, 200, 0, 255])),
        SourceTile::new("dirt", solid(16, 16, [120, 72, 0, 255])),
        SourceTile::new("pebble", solid(8, 8, [90, 90, 90, 255])),
        SourceTile::new("cliff", solid(32, 16, [60, 60, 80, 255])),
    ]
}

#[test]
fn empty_input_is_fatal() {
    let result = build_atlas(vec![], &BuildConfig::default());
    match result {
        Err(TileAtlasError::Empty) => {}
        _ => panic!("Expected Empty error"),
    }
}

#[test]
fn zero_columns_is_invalid() {
    let cfg = BuildConfig {
        columns: 0,
        ..Default::default()
    };
    let result = build_atlas(sample_tiles(), &cfg);
    match result {
        Err(TileAtlasError::InvalidConfig(msg)) => assert!(msg.contains("columns")),
        _ => panic!("Expected InvalidConfig error"),
    }
}

#[test]
fn zero_cell_size_is_invalid_in_split_mode() {
    let cfg = BuildConfig {
        policy: NormalizePolicy::SplitFixedCell,
        cell_size: 0,
        ..Default::default()
    };
    let result = build_atlas(sample_tiles(), &cfg);
    match result {
        Err(TileAtlasError::InvalidConfig(msg)) => assert!(msg.contains("cell_size")),
        _ => panic!("Expected InvalidConfig error"),
    }
}

#[test]
fn cell_counts_agree_across_artifacts() {
    let cfg = BuildConfig {
        policy: NormalizePolicy::SplitFixedCell,
        cell_size: 16,
        ..Default::default()
    };
    let out = build_atlas(sample_tiles(), &cfg).expect("build");

    // grass, dirt whole; pebble padded; cliff split into two: 5 cells.
    assert_eq!(out.layout.placements.len(), 5);
    assert_eq!(out.stats.num_cells, 5);
    assert_eq!(out.stats.num_sources, 4);
    assert_eq!(out.stats.num_split, 1);
    assert_eq!(out.stats.num_padded, 1);

    let tres = to_tres("res://atlas.png", &out.layout);
    let records = tres.lines().filter(|l| l.ends_with("/0 = 0")).count();
    assert_eq!(records, out.layout.placements.len());

    let json = to_json_layout(&out.layout);
    assert_eq!(json["cells"].as_array().expect("cells").len(), 5);
    assert_eq!(json["columns"], 16);
    assert_eq!(json["cell"]["w"], 16);
}

#[test]
fn rebuild_is_byte_identical() {
    let cfg = BuildConfig::default();
    let a = build_atlas(sample_tiles(), &cfg).expect("build a");
    let b = build_atlas(sample_tiles(), &cfg).expect("build b");

    assert_eq!(a.rgba.dimensions(), b.rgba.dimensions());
    assert_eq!(a.rgba.as_raw(), b.rgba.as_raw());
    assert_eq!(
        to_tres("res://atlas.png", &a.layout),
        to_tres("res://atlas.png", &b.layout)
    );
}

#[test]
fn stats_summary_mentions_grid_shape() {
    let out = build_atlas(sample_tiles(), &BuildConfig::default()).expect("build");
    let summary = out.stats.summary();
    assert!(summary.contains("Sources: 4"));
    assert!(summary.contains("Cells: 4"));
    assert!(out.stats.grid_occupancy() > 0.0);
}

#[test]
fn every_source_maps_to_at_least_one_cell() {
    let cfg = BuildConfig {
        policy: NormalizePolicy::SplitFixedCell,
        cell_size: 16,
        ..Default::default()
    };
    let out = build_atlas(sample_tiles(), &cfg).expect("build");
    for name in ["grass", "dirt", "pebble", "cliff"] {
        assert!(
            out.layout.placements.iter().any(|p| p.origin == name),
            "{name} has no cell"
        );
    }
}
