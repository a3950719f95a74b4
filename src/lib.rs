//! sensor_exporter: aligned exports of station sensor measurements.
//!
//! # Module structure
//!
//! ```text
//! sensor_exporter
//! ├── model      — shared data types (Sensor, Measurement, DateRange, AlignedTable, …)
//! ├── config     — exporter.toml loader
//! ├── error      — crate-level ExportError
//! ├── logging    — tracing subscriber setup
//! ├── db         — PostgreSQL connection and table validation
//! ├── repository — MeasurementRepository trait, Postgres and in-memory adapters
//! ├── registry   — known station / sensor type codes
//! ├── analysis
//! │   ├── dedup    — latest-received-wins deduplication
//! │   ├── timeline — fixed 15-minute timelines
//! │   ├── align    — exact-match join onto the timeline
//! │   └── summary  — per-sensor counts
//! ├── render     — preview table, summary table, CSV
//! └── report     — pipeline tying the above together
//! ```

pub mod analysis;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod registry;
pub mod render;
pub mod report;
pub mod repository;
