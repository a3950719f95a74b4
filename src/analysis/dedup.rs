//! Deduplication of corrected readings.
//!
//! A sensor can deliver the same reading several times as it gets corrected
//! upstream. Each version shares `measured_at` and differs in `received_at`;
//! the latest received version is the authoritative one.
//!
//! Obsolete rows are filtered by the repository before this runs, so the
//! `is_obsolete` flag is not looked at here.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::model::Measurement;

/// Keeps one measurement per distinct `measured_at`: the one with the
/// greatest `received_at`.
///
/// On a tie in `received_at` the measurement seen first in the input wins.
/// The result is ordered by ascending `measured_at`.
pub fn deduplicate(measurements: Vec<Measurement>) -> Vec<Measurement> {
    let mut latest: BTreeMap<_, Measurement> = BTreeMap::new();

    for measurement in measurements {
        match latest.entry(measurement.measured_at) {
            Entry::Vacant(slot) => {
                slot.insert(measurement);
            }
            Entry::Occupied(mut slot) => {
                // Strictly greater: ties keep the earlier entry.
                if measurement.received_at > slot.get().received_at {
                    slot.insert(measurement);
                }
            }
        }
    }

    latest.into_values().collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
