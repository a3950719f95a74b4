//! Alignment of per-sensor series onto a shared timeline.
//!
//! `align` is an exact-match join: the cell for (t, sensor) holds the
//! sensor's deduplicated value measured exactly at `t`, or `None`. There is
//! no interpolation and no nearest-neighbour lookup. Readings that fall
//! between timeline stamps are not shown.
//!
//! Cells stay typed (`Option<f64>`). Formatting for preview or CSV happens
//! in `render`.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::analysis::timeline::Timeline;
use crate::model::{AlignedRow, AlignedTable, SensorSeries};

/// Builds one row per timeline timestamp and one column per series, in the
/// order the series are given.
pub fn align(timeline: Timeline, series: &[SensorSeries]) -> AlignedTable {
    let column_count = series.len();

    let mut rows: Vec<AlignedRow> = timeline
        .map(|measured_at| AlignedRow {
            measured_at,
            values: vec![None; column_count],
        })
        .collect();

    let row_index: HashMap<NaiveDateTime, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (row.measured_at, i))
        .collect();

    let column_index = column_index(series);

    for s in series {
        let Some(&column) = column_index.get(s.sensor_id.as_str()) else {
            continue;
        };
        for (measured_at, value) in &s.values {
            if let Some(&row) = row_index.get(measured_at) {
                rows[row].values[column] = Some(*value);
            }
        }
    }

    AlignedTable {
        sensor_ids: series.iter().map(|s| s.sensor_id.clone()).collect(),
        rows,
    }
}

/// Sensor id to column position. A repeated id keeps its first column.
fn column_index(series: &[SensorSeries]) -> HashMap<&str, usize> {
    let mut index = HashMap::with_capacity(series.len());
    for (column, s) in series.iter().enumerate() {
        index.entry(s.sensor_id.as_str()).or_insert(column);
    }
    index
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
