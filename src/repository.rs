//! Read access to sensors and their measurements.
//!
//! `MeasurementRepository` is the only way the report pipeline touches
//! storage. `PostgresRepository` reads the production tables;
//! `InMemoryRepository` holds fixtures so the pipeline can run without a
//! database.
//!
//! Range filters are inclusive on both ends in every implementation.

use chrono::NaiveDateTime;
use postgres::Client;
use thiserror::Error;

use crate::model::{DateRange, Measurement, Sensor, SensorSelection, SensorType};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database query failed: {0}")]
    Query(#[from] postgres::Error),
}

pub trait MeasurementRepository {
    /// Sensors matching `selection`. Unmatched requested ids are not an
    /// error; they simply yield no sensor. Order is the store's discovery
    /// order.
    fn list_sensors(&mut self, selection: &SensorSelection) -> Result<Vec<Sensor>, RepositoryError>;

    /// Measurements of `sensor` with `measured_at` inside `range`.
    fn measurements_for_sensor(
        &mut self,
        sensor: &Sensor,
        range: &DateRange,
        exclude_obsolete: bool,
    ) -> Result<Vec<Measurement>, RepositoryError>;
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

/// Repository over the `Station` / `Sensor` / `SensorType` / `Measurement`
/// tables. Identifiers are quoted because the tables use mixed case.
pub struct PostgresRepository {
    client: Client,
    schema: String,
}

impl PostgresRepository {
    pub fn new(client: Client, schema: &str) -> Self {
        Self {
            client,
            schema: quote_identifier(schema),
        }
    }

    fn table(&self, name: &str) -> String {
        format!("{}.\"{}\"", self.schema, name)
    }
}

/// Double-quotes a SQL identifier, escaping embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl MeasurementRepository for PostgresRepository {
    fn list_sensors(
        &mut self,
        selection: &SensorSelection,
    ) -> Result<Vec<Sensor>, RepositoryError> {
        let base = format!(
            "SELECT s.\"DomainId\", t.\"DomainId\", t.\"Unit\", t.\"ValueType\", \
                    t.\"PredictionHorizonInHours\" \
             FROM {sensor} s \
             LEFT JOIN {sensor_type} t ON t.\"Id\" = s.\"TypeId\"",
            sensor = self.table("Sensor"),
            sensor_type = self.table("SensorType"),
        );

        let rows = if selection.is_all() {
            let sql = format!("{} ORDER BY s.\"DomainId\"", base);
            self.client.query(sql.as_str(), &[])?
        } else {
            let ids: Vec<String> = selection.ids().to_vec();
            let sql = format!("{} WHERE s.\"DomainId\" = ANY($1) ORDER BY s.\"DomainId\"", base);
            self.client.query(sql.as_str(), &[&ids])?
        };

        let mut sensors: Vec<Sensor> = Vec::with_capacity(rows.len());
        for row in rows {
            let domain_id: Option<String> = row.get(0);
            let Some(domain_id) = domain_id else {
                continue;
            };
            // Domain ids are the column keys; a repeated id keeps the first row.
            if sensors.iter().any(|s| s.domain_id == domain_id) {
                tracing::warn!(sensor = %domain_id, "duplicate sensor domain id, keeping first");
                continue;
            }
            let type_id: Option<String> = row.get(1);
            let unit: Option<String> = row.get(2);
            let value_type: Option<String> = row.get(3);
            let horizon: Option<i32> = row.get(4);

            sensors.push(Sensor {
                domain_id,
                sensor_type: SensorType {
                    domain_id: type_id.unwrap_or_default(),
                    unit: unit.unwrap_or_default(),
                    value_type: value_type.unwrap_or_default(),
                    prediction_horizon_hours: horizon.unwrap_or(0),
                },
            });
        }

        Ok(sensors)
    }

    fn measurements_for_sensor(
        &mut self,
        sensor: &Sensor,
        range: &DateRange,
        exclude_obsolete: bool,
    ) -> Result<Vec<Measurement>, RepositoryError> {
        let sql = format!(
            "SELECT m.\"MeasuredValue\", m.\"MeasuredAt\", m.\"ReceivedAt\", m.\"IsObsolete\" \
             FROM {measurement} m \
             JOIN {sensor} s ON s.\"Id\" = m.\"SensorId\" \
             WHERE s.\"DomainId\" = $1 \
               AND ($2::timestamp IS NULL OR m.\"MeasuredAt\" >= $2) \
               AND ($3::timestamp IS NULL OR m.\"MeasuredAt\" <= $3) \
               AND (NOT $4 OR NOT m.\"IsObsolete\") \
             ORDER BY m.\"MeasuredAt\", m.\"ReceivedAt\", m.\"Id\"",
            measurement = self.table("Measurement"),
            sensor = self.table("Sensor"),
        );

        let rows = self.client.query(
            sql.as_str(),
            &[&sensor.domain_id, &range.from, &range.to, &exclude_obsolete],
        )?;

        let measurements = rows
            .iter()
            .map(|row| Measurement {
                measured_value: row.get(0),
                measured_at: row.get::<_, NaiveDateTime>(1),
                received_at: row.get::<_, NaiveDateTime>(2),
                is_obsolete: row.get(3),
            })
            .collect();

        Ok(measurements)
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Fixture-backed repository. Sensors are discovered in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    sensors: Vec<(Sensor, Vec<Measurement>)>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sensor(mut self, sensor: Sensor, measurements: Vec<Measurement>) -> Self {
        self.add_sensor(sensor, measurements);
        self
    }

    pub fn add_sensor(&mut self, sensor: Sensor, measurements: Vec<Measurement>) {
        self.sensors.push((sensor, measurements));
    }
}

impl MeasurementRepository for InMemoryRepository {
    fn list_sensors(
        &mut self,
        selection: &SensorSelection,
    ) -> Result<Vec<Sensor>, RepositoryError> {
        Ok(self
            .sensors
            .iter()
            .filter(|(sensor, _)| selection.matches(&sensor.domain_id))
            .map(|(sensor, _)| sensor.clone())
            .collect())
    }

    fn measurements_for_sensor(
        &mut self,
        sensor: &Sensor,
        range: &DateRange,
        exclude_obsolete: bool,
    ) -> Result<Vec<Measurement>, RepositoryError> {
        Ok(self
            .sensors
            .iter()
            .filter(|(s, _)| s.domain_id == sensor.domain_id)
            .flat_map(|(_, measurements)| measurements.iter())
            .filter(|m| !(exclude_obsolete && m.is_obsolete))
            .filter(|m| range.contains(m.measured_at))
            .cloned()
            .collect())
    }
}
