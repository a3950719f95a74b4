//! Time-series analysis for the sensor exporter.
//!
//! Submodules:
//! - `dedup`    - collapses corrected readings to the latest received version.
//! - `timeline` - fixed 15-minute timestamp sequences.
//! - `align`    - exact-match join of per-sensor series onto a timeline.
//! - `summary`  - per-sensor measurement counts within a range.

pub mod align;
pub mod dedup;
pub mod summary;
pub mod timeline;
