//! Shared data types for the sensor exporter.
//!
//! Everything here is a read-only snapshot: entities are materialized once
//! per run from the repository and never written back.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

use crate::error::ExportError;

// ---------------------------------------------------------------------------
// Sensor types
// ---------------------------------------------------------------------------

/// Kind of quantity a sensor measures.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorType {
    pub domain_id: String,
    pub unit: String,
    /// Label shown in the summary, e.g. "Level" or "Rainfall".
    pub value_type: String,
    pub prediction_horizon_hours: i32,
}

// ---------------------------------------------------------------------------
// Sensors and measurements
// ---------------------------------------------------------------------------

/// A single sensor, identified by its domain id (usually `station:type`).
#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    pub domain_id: String,
    pub sensor_type: SensorType,
}

impl Sensor {
    pub fn value_type(&self) -> &str {
        &self.sensor_type.value_type
    }
}

/// One received version of a reading.
///
/// Several measurements can share a sensor and `measured_at`; the one with
/// the latest `received_at` is authoritative.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub measured_value: f64,
    pub measured_at: NaiveDateTime,
    pub received_at: NaiveDateTime,
    pub is_obsolete: bool,
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Inclusive time range with optional bounds. `None` means unbounded on
/// that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Self {
        Self { from, to }
    }

    /// Unbounded on both sides.
    pub fn all() -> Self {
        Self::default()
    }

    /// `from <= t <= to`, ignoring absent bounds.
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.from.is_none_or(|from| from <= t) && self.to.is_none_or(|to| t <= to)
    }

    /// Both bounds present, if any.
    pub fn bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((self.from?, self.to?))
    }

    /// True when both bounds are set and `from > to`.
    pub fn is_degenerate(&self) -> bool {
        matches!(self.bounds(), Some((from, to)) if from > to)
    }
}

/// Parses a command-line timestamp.
///
/// Accepts RFC 3339 (converted to UTC, the zone measurements are stored
/// in), `YYYY-MM-DD HH:MM[:SS]`, `YYYY-MM-DDTHH:MM[:SS]` and `YYYY-MM-DD`
/// (midnight).
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, ExportError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN));
    }

    Err(ExportError::InvalidDate(raw.to_string()))
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.from {
            Some(from) => write!(f, "{}", from)?,
            None => write!(f, "the beginning")?,
        }
        write!(f, " to ")?;
        match self.to {
            Some(to) => write!(f, "{}", to),
            None => write!(f, "the end"),
        }
    }
}

/// Which sensors take part in an aligned export.
///
/// An empty selection means every sensor, in discovery order. Otherwise the
/// requested order is kept and becomes the column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensorSelection {
    ids: Vec<String>,
}

impl SensorSelection {
    pub fn all() -> Self {
        Self::default()
    }

    /// Builds a selection from requested ids. Blank entries are dropped and
    /// repeated ids keep their first position.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selected: Vec<String> = Vec::new();
        for id in ids {
            let id = id.as_ref().trim();
            if id.is_empty() || selected.iter().any(|s| s == id) {
                continue;
            }
            selected.push(id.to_string());
        }
        Self { ids: selected }
    }

    pub fn is_all(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn matches(&self, domain_id: &str) -> bool {
        self.is_all() || self.ids.iter().any(|id| id == domain_id)
    }

    /// Puts `sensors` into column order: requested order for an explicit
    /// selection, otherwise unchanged. Sensors not selected are dropped.
    pub fn order(&self, sensors: Vec<Sensor>) -> Vec<Sensor> {
        if self.is_all() {
            return sensors;
        }
        let mut by_id: BTreeMap<String, Sensor> = sensors
            .into_iter()
            .filter(|s| self.matches(&s.domain_id))
            .map(|s| (s.domain_id.clone(), s))
            .collect();
        self.ids.iter().filter_map(|id| by_id.remove(id)).collect()
    }

    /// Requested ids that match none of `sensors`.
    pub fn unknown_ids(&self, sensors: &[Sensor]) -> Vec<String> {
        self.ids
            .iter()
            .filter(|id| !sensors.iter().any(|s| &s.domain_id == *id))
            .cloned()
            .collect()
    }
}

impl std::fmt::Display for SensorSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_all() {
            write!(f, "All")
        } else {
            write!(f, "{}", self.ids.join(", "))
        }
    }
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Deduplicated values of one sensor keyed by measured-at.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SensorSeries {
    pub sensor_id: String,
    pub values: BTreeMap<NaiveDateTime, f64>,
}

impl SensorSeries {
    pub fn new(sensor_id: impl Into<String>) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            values: BTreeMap::new(),
        }
    }

    /// Builds a series from already-deduplicated measurements.
    pub fn from_measurements(sensor_id: impl Into<String>, measurements: &[Measurement]) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            values: measurements
                .iter()
                .map(|m| (m.measured_at, m.measured_value))
                .collect(),
        }
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.values.keys().next().copied()
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.values.keys().next_back().copied()
    }
}

/// One timeline timestamp with one optional value per selected sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    pub measured_at: NaiveDateTime,
    pub values: Vec<Option<f64>>,
}

/// Label of the leading timestamp column.
pub const MEASURED_AT_HEADER: &str = "MeasuredAt";

/// Rectangular table: rows are timeline timestamps, columns are sensors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedTable {
    pub sensor_ids: Vec<String>,
    pub rows: Vec<AlignedRow>,
}

impl AlignedTable {
    /// `MeasuredAt` followed by the sensor ids in column order.
    pub fn header(&self) -> Vec<String> {
        std::iter::once(MEASURED_AT_HEADER.to_string())
            .chain(self.sensor_ids.iter().cloned())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One line of the per-sensor count summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub domain_id: String,
    pub value_type: String,
    pub measurements_count: usize,
}
