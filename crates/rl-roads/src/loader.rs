//! CSV road-tile loader.
//!
//! # CSV format
//!
//! One row per road tile, with a header:
//!
//! ```csv
//! x,y
//! 0,0
//! 1,0
//! 2,0
//! ```
//!
//! Feed the result to [`RoadGraph::rebuild`](crate::RoadGraph::rebuild).
//! Duplicate rows are harmless.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use rl_core::GridCoord;

use crate::RoadError;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TileRecord {
    x: i32,
    y: i32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load road tile positions from a CSV file.
pub fn load_road_tiles_csv(path: &Path) -> Result<Vec<GridCoord>, RoadError> {
    let file = std::fs::File::open(path).map_err(RoadError::Io)?;
    load_road_tiles_reader(file)
}

/// Like [`load_road_tiles_csv`] but accepts any `Read` source.
pub fn load_road_tiles_reader<R: Read>(reader: R) -> Result<Vec<GridCoord>, RoadError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    csv_reader
        .deserialize::<TileRecord>()
        .map(|row| {
            row.map(|r| GridCoord::new(r.x, r.y))
                .map_err(|e| RoadError::Parse(e.to_string()))
        })
        .collect()
}
