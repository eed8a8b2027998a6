//! Godot `.tres` TileSet descriptor output.
//!
//! The descriptor is built as a structured document (ordered sections of
//! key/value lines) and serialized last, so the traversal that fills it in
//! never touches formatting. Cell records are emitted in ascending grid index
//! order, guaranteeing reproducible byte output across runs.

use crate::model::{AtlasLayout, CellSize};
use std::fmt::Write;

/// One `[...]` block of a Godot text resource. Entry groups render as
/// `key = value` lines separated by a blank line.
#[derive(Debug, Clone)]
pub struct GdSection {
    pub header: String,
    pub groups: Vec<Vec<(String, String)>>,
}

impl GdSection {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            groups: Vec::new(),
        }
    }

    pub fn group(mut self, entries: Vec<(String, String)>) -> Self {
        self.groups.push(entries);
        self
    }
}

/// An ordered Godot text resource document.
#[derive(Debug, Clone)]
pub struct GdDocument {
    pub header: String,
    pub sections: Vec<GdSection>,
}

impl GdDocument {
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.header);
        for section in &self.sections {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", section.header);
            for (gi, group) in section.groups.iter().enumerate() {
                if gi > 0 {
                    let _ = writeln!(out);
                }
                for (k, v) in group {
                    let _ = writeln!(out, "{k} = {v}");
                }
            }
        }
        out
    }
}

/// Full-cell axis-aligned collision polygon in cell-local coordinates.
/// Identical for every tile; not derived from tile content.
fn full_cell_polygon(cell: CellSize) -> String {
    format!(
        "PackedVector2Array(0, 0, {w}, 0, {w}, {h}, 0, {h})",
        w = cell.w,
        h = cell.h
    )
}

/// Build the TileSet descriptor document for a composed atlas.
///
/// `atlas_path` is the engine-facing texture path (e.g. `res://.../atlas.png`)
/// written verbatim into the external-resource reference.
pub fn tileset_document(atlas_path: &str, layout: &AtlasLayout) -> GdDocument {
    let cell = layout.cell;

    let mut placements: Vec<_> = layout.placements.iter().collect();
    placements.sort_by_key(|p| p.pos.row * layout.columns + p.pos.col);

    let mut tile_lines = Vec::with_capacity(placements.len() * 2);
    for p in placements {
        let at = format!("{}:{}", p.pos.col, p.pos.row);
        tile_lines.push((format!("{at}/0"), "0".to_string()));
        tile_lines.push((
            format!("{at}/0/physics_layer_0/polygon_0/points"),
            full_cell_polygon(cell),
        ));
    }

    GdDocument {
        header: r#"[gd_resource type="TileSet" load_steps=2 format=3]"#.into(),
        sections: vec![
            GdSection::new(format!(
                r#"[ext_resource type="Texture2D" path="{atlas_path}" id="1"]"#
            )),
            GdSection::new(r#"[sub_resource type="TileSetAtlasSource" id="TileSetAtlasSource_1"]"#)
                .group(vec![
                    ("texture".into(), r#"ExtResource("1")"#.into()),
                    (
                        "texture_region_size".into(),
                        format!("Vector2i({}, {})", cell.w, cell.h),
                    ),
                    ("use_texture_padding".into(), "false".into()),
                ])
                .group(tile_lines),
            GdSection::new("[resource]").group(vec![
                (
                    "tile_size".into(),
                    format!("Vector2i({}, {})", cell.w, cell.h),
                ),
                (
                    "sources/0".into(),
                    r#"SubResource("TileSetAtlasSource_1")"#.into(),
                ),
            ]),
        ],
    }
}

/// Render the TileSet descriptor to its final UTF-8 text form.
pub fn to_tres(atlas_path: &str, layout: &AtlasLayout) -> String {
    tileset_document(atlas_path, layout).render()
}
