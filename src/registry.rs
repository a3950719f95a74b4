//! Registry of known stations and sensor types.
//!
//! Sensor domain ids are composite `station:type` codes such as `5000:10`
//! (the level sensor at the Granetalsperre weather station). This module
//! knows the station and type numbers in use and turns a code into a
//! readable label for log output. Codes that are not listed here are still
//! valid sensors; they just have no label.

// ---------------------------------------------------------------------------
// Stations
// ---------------------------------------------------------------------------

struct KnownStation {
    domain_id: i32,
    name: &'static str,
}

static STATION_REGISTRY: &[KnownStation] = &[
    KnownStation { domain_id: 5000, name: "WS Granetalsperre" },
    KnownStation { domain_id: 150424, name: "WS Gosetal" },
    KnownStation { domain_id: 150423, name: "WS Wintertal" },
    KnownStation { domain_id: 150422, name: "WS Hahnenklee" },
    KnownStation { domain_id: 48211160, name: "Gosetal UW" },
    KnownStation { domain_id: 48211250, name: "Wintertal" },
    KnownStation { domain_id: 48211350, name: "Rammelsberghaus" },
    KnownStation { domain_id: 48861030, name: "Margarethenklippe" },
];

// ---------------------------------------------------------------------------
// Sensor types
// ---------------------------------------------------------------------------

struct KnownSensorType {
    domain_id: i32,
    name: &'static str,
}

pub const LEVEL: i32 = 10;
pub const LEVEL_PREDICTION_2H: i32 = 10001;
pub const LEVEL_PREDICTION_3H: i32 = 10002;
pub const LEVEL_PREDICTION_4H: i32 = 10003;
pub const RAINFALL: i32 = 101;
pub const AIR_TEMPERATURE: i32 = 130;
pub const SNOW_HEIGHT: i32 = 6030;
pub const HUMIDITY: i32 = 300;
pub const FLOW: i32 = 200;
pub const V_FLOW: i32 = 3500;

static SENSOR_TYPE_REGISTRY: &[KnownSensorType] = &[
    KnownSensorType { domain_id: LEVEL, name: "level" },
    KnownSensorType { domain_id: LEVEL_PREDICTION_2H, name: "level prediction (2h)" },
    KnownSensorType { domain_id: LEVEL_PREDICTION_3H, name: "level prediction (3h)" },
    KnownSensorType { domain_id: LEVEL_PREDICTION_4H, name: "level prediction (4h)" },
    KnownSensorType { domain_id: RAINFALL, name: "rainfall" },
    KnownSensorType { domain_id: AIR_TEMPERATURE, name: "air temperature" },
    KnownSensorType { domain_id: SNOW_HEIGHT, name: "snow height" },
    KnownSensorType { domain_id: HUMIDITY, name: "humidity" },
    KnownSensorType { domain_id: FLOW, name: "flow" },
    KnownSensorType { domain_id: V_FLOW, name: "v-flow" },
];

fn find_station(domain_id: i32) -> Option<&'static KnownStation> {
    STATION_REGISTRY.iter().find(|s| s.domain_id == domain_id)
}

fn find_sensor_type(domain_id: i32) -> Option<&'static KnownSensorType> {
    SENSOR_TYPE_REGISTRY.iter().find(|t| t.domain_id == domain_id)
}

// ---------------------------------------------------------------------------
// Composite sensor codes
// ---------------------------------------------------------------------------

/// Parsed `station:type` sensor code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorCode {
    pub station: i32,
    pub sensor_type: i32,
}

impl SensorCode {
    /// Parses `"5000:10"`. Returns `None` for anything else.
    pub fn parse(domain_id: &str) -> Option<Self> {
        let (station, sensor_type) = domain_id.trim().split_once(':')?;
        Some(Self {
            station: station.trim().parse().ok()?,
            sensor_type: sensor_type.trim().parse().ok()?,
        })
    }
}

/// Readable label such as "WS Granetalsperre / level", when both parts of
/// the code are known.
pub fn describe(domain_id: &str) -> Option<String> {
    let code = SensorCode::parse(domain_id)?;
    let station = find_station(code.station)?;
    let sensor_type = find_sensor_type(code.sensor_type)?;
    Some(format!("{} / {}", station.name, sensor_type.name))
}
