use crate::model::AtlasLayout;
use serde_json::{Value, json};

/// Serialize the atlas layout as a JSON object for generic tooling:
/// `{ columns, rows, cell, width, height, cells: [...] }` with one record per
/// occupied cell, in placement order (ascending grid index).
pub fn to_json_layout(layout: &AtlasLayout) -> Value {
    let cells: Vec<Value> = layout
        .placements
        .iter()
        .map(|p| {
            json!({
                "name": p.name,
                "origin": p.origin,
                "col": p.pos.col,
                "row": p.pos.row,
                "x": p.pos.col * layout.cell.w,
                "y": p.pos.row * layout.cell.h,
            })
        })
        .collect();
    json!({
        "columns": layout.columns,
        "rows": layout.rows,
        "cell": { "w": layout.cell.w, "h": layout.cell.h },
        "width": layout.width(),
        "height": layout.height(),
        "cells": cells,
    })
}
