//! Per-sensor measurement counts.
//!
//! A straight filtered count: no timeline, no deduplication. Every sensor
//! gets a row, including sensors with nothing in range.

use crate::model::{DateRange, Measurement, Sensor, SummaryRow};

/// Number of measurements with `measured_at` inside `range` (inclusive).
/// Obsolete measurements only count when `include_obsolete` is set.
pub fn count_in_range(
    measurements: &[Measurement],
    range: &DateRange,
    include_obsolete: bool,
) -> usize {
    measurements
        .iter()
        .filter(|m| include_obsolete || !m.is_obsolete)
        .filter(|m| range.contains(m.measured_at))
        .count()
}

/// One `SummaryRow` per sensor, in the order given.
pub fn summarize(
    sensors: &[(Sensor, Vec<Measurement>)],
    range: &DateRange,
    include_obsolete: bool,
) -> Vec<SummaryRow> {
    sensors
        .iter()
        .map(|(sensor, measurements)| SummaryRow {
            domain_id: sensor.domain_id.clone(),
            value_type: sensor.value_type().to_string(),
            measurements_count: count_in_range(measurements, range, include_obsolete),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SensorType;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    fn sensor(id: &str, value_type: &str) -> Sensor {
        Sensor {
            domain_id: id.to_string(),
            sensor_type: SensorType {
                domain_id: "10".to_string(),
                unit: "cm".to_string(),
                value_type: value_type.to_string(),
                prediction_horizon_hours: 0,
            },
        }
    }

    fn reading(measured_at: NaiveDateTime, is_obsolete: bool) -> Measurement {
        Measurement {
            measured_value: 1.0,
            measured_at,
            received_at: measured_at,
            is_obsolete,
        }
    }

    #[test]
    fn test_counts_three_and_zero() {
        let sensors = vec![
            (
                sensor("A", "Level"),
                vec![
                    reading(at(0, 0), false),
                    reading(at(0, 15), false),
                    reading(at(0, 30), false),
                ],
            ),
            (sensor("B", "Rainfall"), vec![]),
        ];

        let rows = summarize(&sensors, &DateRange::all(), false);

        assert_eq!(
            rows,
            vec![
                SummaryRow {
                    domain_id: "A".to_string(),
                    value_type: "Level".to_string(),
                    measurements_count: 3,
                },
                SummaryRow {
                    domain_id: "B".to_string(),
                    value_type: "Rainfall".to_string(),
                    measurements_count: 0,
                },
            ]
        );
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let measurements = vec![
            reading(at(0, 0), false),
            reading(at(1, 0), false),
            reading(at(1, 15), false),
        ];
        let range = DateRange::new(Some(at(0, 0)), Some(at(1, 0)));
        assert_eq!(count_in_range(&measurements, &range, false), 2);
    }

    #[test]
    fn test_obsolete_policy() {
        let measurements = vec![reading(at(0, 0), false), reading(at(0, 0), true)];
        assert_eq!(count_in_range(&measurements, &DateRange::all(), false), 1);
        assert_eq!(count_in_range(&measurements, &DateRange::all(), true), 2);
    }

    #[test]
    fn test_duplicates_are_counted_individually() {
        let measurements = vec![reading(at(0, 0), false), reading(at(0, 0), false)];
        assert_eq!(count_in_range(&measurements, &DateRange::all(), false), 2);
    }
}
