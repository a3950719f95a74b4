//! Presentation of aligned tables and summaries.
//!
//! - `render_preview` - bordered console table, fixed decimals, blank cells
//!   for absent values.
//! - `write_csv`      - comma-delimited, culture-invariant numbers, empty
//!   field for absent values.
//! - `render_summary` - per-sensor count table.

use std::io::Write;

use chrono::NaiveDateTime;
use csv::{Terminator, WriterBuilder};
use tabled::{builder::Builder, settings::Style};

use crate::model::{AlignedTable, SummaryRow};

/// Formatting settings shared by the preview and CSV writers.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub timestamp_format: String,
    pub preview_decimals: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
            preview_decimals: 2,
        }
    }
}

pub fn format_timestamp(t: NaiveDateTime, format: &str) -> String {
    t.format(format).to_string()
}

/// Invariant numeric text for CSV: period as decimal separator, no grouping,
/// and integral values keep a trailing `.0`.
pub fn format_csv_value(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}

pub fn format_preview_value(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => String::new(),
    }
}

/// Writes the header row and one line per aligned row.
pub fn write_csv<W: Write>(
    table: &AlignedTable,
    options: &RenderOptions,
    out: &mut W,
) -> std::io::Result<()> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    writer.write_record(table.header())?;

    for row in &table.rows {
        let mut fields = Vec::with_capacity(row.values.len() + 1);
        fields.push(format_timestamp(row.measured_at, &options.timestamp_format));
        fields.extend(
            row.values
                .iter()
                .map(|v| v.map(format_csv_value).unwrap_or_default()),
        );
        writer.write_record(&fields)?;
    }

    writer.flush()
}

fn bordered_table(records: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();
    for record in records {
        builder.push_record(record);
    }
    let mut table = builder.build();
    table.with(Style::ascii());
    table.to_string()
}

pub fn render_preview(table: &AlignedTable, options: &RenderOptions) -> String {
    let mut records = Vec::with_capacity(table.rows.len() + 1);
    records.push(table.header());

    for row in &table.rows {
        let mut record = Vec::with_capacity(row.values.len() + 1);
        record.push(format_timestamp(row.measured_at, &options.timestamp_format));
        record.extend(
            row.values
                .iter()
                .map(|v| format_preview_value(*v, options.preview_decimals)),
        );
        records.push(record);
    }

    bordered_table(records)
}

pub fn render_summary(rows: &[SummaryRow]) -> String {
    let mut records = Vec::with_capacity(rows.len() + 1);
    records.push(vec![
        "DomainId".to_string(),
        "ValueType".to_string(),
        "MeasurementsCount".to_string(),
    ]);
    for row in rows {
        records.push(vec![
            row.domain_id.clone(),
            row.value_type.clone(),
            row.measurements_count.to_string(),
        ]);
    }

    bordered_table(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
