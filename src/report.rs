//! Report pipeline: repository → dedup → timeline → align → render.
//!
//! `Exporter` owns a repository and produces the two underlying views
//! (summary rows and the aligned table). `run` picks the view for the
//! requested format and writes it out. Preview and CSV share `aligned`, so
//! both apply the same range and boundary rules.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::analysis::{align::align, dedup::deduplicate, summary::summarize, timeline::Timeline};
use crate::config::ExporterConfig;
use crate::error::{ExportError, Result};
use crate::model::{AlignedTable, DateRange, SensorSelection, SensorSeries, SummaryRow};
use crate::registry;
use crate::render::{self, RenderOptions};
use crate::repository::{MeasurementRepository, RepositoryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Preview,
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Summary => write!(f, "Summary"),
            OutputFormat::Preview => write!(f, "Preview"),
            OutputFormat::Csv => write!(f, "Csv"),
        }
    }
}

/// Aligned table plus the requested sensor ids that matched nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedReport {
    pub table: AlignedTable,
    pub unknown_sensors: Vec<String>,
}

pub struct Exporter<R: MeasurementRepository> {
    repository: R,
}

impl<R: MeasurementRepository> Exporter<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Per-sensor counts over every sensor in the store.
    pub fn summary(
        &mut self,
        range: &DateRange,
        include_obsolete: bool,
    ) -> std::result::Result<Vec<SummaryRow>, RepositoryError> {
        let sensors = self.repository.list_sensors(&SensorSelection::all())?;

        let mut with_measurements = Vec::with_capacity(sensors.len());
        for sensor in sensors {
            let measurements = self
                .repository
                .measurements_for_sensor(&sensor, range, !include_obsolete)?;
            with_measurements.push((sensor, measurements));
        }

        Ok(summarize(&with_measurements, range, include_obsolete))
    }

    /// Deduplicated, timeline-aligned table of the selected sensors.
    ///
    /// Unknown requested ids are logged as warnings and listed in the
    /// report; they never fail the run.
    pub fn aligned(
        &mut self,
        selection: &SensorSelection,
        range: &DateRange,
    ) -> std::result::Result<AlignedReport, RepositoryError> {
        let discovered = self.repository.list_sensors(selection)?;

        let unknown_sensors = selection.unknown_ids(&discovered);
        for id in &unknown_sensors {
            warn!(sensor = %id, "requested sensor not found, skipping");
        }

        let sensors = selection.order(discovered);

        let mut series = Vec::with_capacity(sensors.len());
        for sensor in &sensors {
            let measurements = self.repository.measurements_for_sensor(sensor, range, true)?;
            let fetched = measurements.len();
            let latest = deduplicate(measurements);

            match registry::describe(&sensor.domain_id) {
                Some(label) => debug!(
                    sensor = %sensor.domain_id,
                    label = %label,
                    fetched,
                    kept = latest.len(),
                    "loaded measurements"
                ),
                None => debug!(
                    sensor = %sensor.domain_id,
                    fetched,
                    kept = latest.len(),
                    "loaded measurements"
                ),
            }

            series.push(SensorSeries::from_measurements(sensor.domain_id.clone(), &latest));
        }

        if range.is_degenerate() {
            warn!(%range, "start of range is after its end, nothing to align");
        }

        let timeline = Timeline::spanning(&series, range);
        debug!(rows = timeline.len(), columns = series.len(), "aligning onto timeline");

        Ok(AlignedReport {
            table: align(timeline, &series),
            unknown_sensors,
        })
    }
}

/// What to produce in one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub format: OutputFormat,
    pub selection: SensorSelection,
    pub range: DateRange,
    /// CSV destination; `None` writes to `stdout`.
    pub output: Option<PathBuf>,
}

/// Produces the requested view and writes it.
///
/// Tables go to `stdout`. CSV goes to `options.output` when set, otherwise
/// to `stdout`.
pub fn run<R, W>(
    exporter: &mut Exporter<R>,
    options: &RunOptions,
    config: &ExporterConfig,
    stdout: &mut W,
) -> Result<()>
where
    R: MeasurementRepository,
    W: Write,
{
    info!("Displaying data from {} formatted as {}.", options.range, options.format);
    info!("Selected sensors: {}.", options.selection);

    let render_options = RenderOptions {
        timestamp_format: config.output.timestamp_format.clone(),
        preview_decimals: config.output.preview_decimals,
    };

    if options.output.is_some() && options.format != OutputFormat::Csv {
        warn!("--output only applies to csv, writing {} to stdout", options.format);
    }

    match options.format {
        OutputFormat::Summary => {
            let rows = exporter.summary(&options.range, config.summary.include_obsolete)?;
            writeln!(stdout, "{}", render::render_summary(&rows))?;
        }
        OutputFormat::Preview => {
            let report = exporter.aligned(&options.selection, &options.range)?;
            writeln!(stdout, "{}", render::render_preview(&report.table, &render_options))?;
        }
        OutputFormat::Csv => {
            let report = exporter.aligned(&options.selection, &options.range)?;
            match &options.output {
                Some(path) => {
                    let write_err = |source| ExportError::WriteFile {
                        path: path.clone(),
                        source,
                    };
                    let file = File::create(path).map_err(write_err)?;
                    let mut writer = BufWriter::new(file);
                    render::write_csv(&report.table, &render_options, &mut writer)
                        .map_err(write_err)?;
                    info!(
                        path = %path.display(),
                        rows = report.table.rows.len(),
                        "CSV file created successfully."
                    );
                }
                None => {
                    render::write_csv(&report.table, &render_options, stdout)?;
                    info!(rows = report.table.rows.len(), "CSV written to stdout.");
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Measurement, Sensor, SensorType};
    use crate::repository::InMemoryRepository;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    fn sensor(id: &str) -> Sensor {
        Sensor {
            domain_id: id.to_string(),
            sensor_type: SensorType {
                domain_id: "10".to_string(),
                unit: "cm".to_string(),
                value_type: "Level".to_string(),
                prediction_horizon_hours: 0,
            },
        }
    }

    fn reading(
        value: f64,
        measured_at: NaiveDateTime,
        received_at: NaiveDateTime,
        is_obsolete: bool,
    ) -> Measurement {
        Measurement {
            measured_value: value,
            measured_at,
            received_at,
            is_obsolete,
        }
    }

    fn exporter() -> Exporter<InMemoryRepository> {
        Exporter::new(
            InMemoryRepository::new()
                .with_sensor(
                    sensor("A"),
                    vec![
                        reading(1.0, at(0, 0), at(10, 0), false),
                        reading(1.5, at(0, 0), at(10, 5), false),
                        reading(2.0, at(0, 15), at(10, 0), false),
                        reading(99.0, at(0, 15), at(11, 0), true),
                    ],
                )
                .with_sensor(sensor("B"), vec![reading(5.0, at(0, 15), at(10, 0), false)]),
        )
    }

    #[test]
    fn test_aligned_dedups_and_skips_obsolete() {
        let report = exporter()
            .aligned(&SensorSelection::all(), &DateRange::all())
            .unwrap();

        assert_eq!(report.table.sensor_ids, vec!["A", "B"]);
        assert_eq!(report.table.rows.len(), 2);
        assert_eq!(report.table.rows[0].values, vec![Some(1.5), None]);
        // The obsolete 99.0 correction is never considered.
        assert_eq!(report.table.rows[1].values, vec![Some(2.0), Some(5.0)]);
        assert!(report.unknown_sensors.is_empty());
    }

    #[test]
    fn test_aligned_reports_unknown_ids() {
        let report = exporter()
            .aligned(&SensorSelection::from_ids(["B", "missing"]), &DateRange::all())
            .unwrap();

        assert_eq!(report.table.sensor_ids, vec!["B"]);
        assert_eq!(report.unknown_sensors, vec!["missing".to_string()]);
    }

    #[test]
    fn test_summary_respects_obsolete_policy() {
        let rows = exporter().summary(&DateRange::all(), false).unwrap();
        assert_eq!(rows[0].measurements_count, 3);
        assert_eq!(rows[1].measurements_count, 1);

        let rows = exporter().summary(&DateRange::all(), true).unwrap();
        assert_eq!(rows[0].measurements_count, 4);
    }

    #[test]
    fn test_degenerate_range_gives_header_only_csv() {
        let options = RunOptions {
            format: OutputFormat::Csv,
            selection: SensorSelection::all(),
            range: DateRange::new(Some(at(1, 0)), Some(at(0, 0))),
            output: None,
        };
        let mut out = Vec::new();
        run(&mut exporter(), &options, &ExporterConfig::default(), &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "MeasuredAt,A,B\n");
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Csv.to_string(), "Csv");
        assert_eq!(OutputFormat::Preview.to_string(), "Preview");
    }
}
