use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic point, degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One row of the city catalog.
///
/// `geoname_id` is opaque and unique per record; the catalog itself may hand
/// out the same record twice across overlapping pages, so uniqueness is a
/// property of the record, not of any accumulated collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityRecord {
    pub name: String,
    pub country: String,
    pub population: u64,
    pub timezone: String,
    pub geoname_id: String,
    pub coordinates: Coordinates,
}

/// Current conditions for one city, in the units that were requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Condition keyword, e.g. "Clear" or "Rain".
    pub condition: String,
    pub description: String,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub temperature: f64,
    pub pressure_hpa: u32,
    pub coordinates: Coordinates,
    pub observation_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitSystem {
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    /// The other system, for the detail view's switch action.
    pub fn toggled(&self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    /// Temperature symbol for display.
    pub fn temp_symbol(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial]
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported systems: metric, imperial."
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_system_as_str_roundtrip() {
        for units in UnitSystem::all() {
            let s = units.as_str();
            let parsed = UnitSystem::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*units, parsed);
        }
    }

    #[test]
    fn unknown_unit_system_error() {
        let err = UnitSystem::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown unit system"));
    }

    #[test]
    fn toggled_is_self_inverse() {
        for units in UnitSystem::all() {
            assert_eq!(units.toggled().toggled(), *units);
        }
    }
}
