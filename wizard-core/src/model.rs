use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// One geocoding result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub name: String,
    pub state: Option<String>,
    pub country: String,
    pub coordinates: Coordinates,
}

impl LocationCandidate {
    /// "Name, State, Country", or "Name, Country" when the state is unknown.
    pub fn display_name(&self) -> String {
        match self.state.as_deref().filter(|s| !s.is_empty()) {
            Some(state) => format!("{}, {}, {}", self.name, state, self.country),
            None => format!("{}, {}", self.name, self.country),
        }
    }
}

/// What the user asked for, before any network call.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// Free text that still needs geocoding.
    Text(String),
    /// A candidate picked from the suggestion list.
    Resolved {
        display: String,
        coordinates: Coordinates,
    },
    /// A raw position from the device.
    Coordinates(Coordinates),
}

impl LocationQuery {
    /// `None` for blank text, which never counts as a selected location.
    pub fn text(input: impl Into<String>) -> Option<Self> {
        let input = input.into();
        let trimmed = input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self::Text(trimmed.to_string()))
        }
    }

    pub fn is_coordinates(&self) -> bool {
        matches!(self, Self::Coordinates(_))
    }
}

impl From<&LocationCandidate> for LocationQuery {
    fn from(candidate: &LocationCandidate) -> Self {
        Self::Resolved { display: candidate.display_name(), coordinates: candidate.coordinates }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Resolved { display, .. } => f.write_str(display),
            Self::Coordinates(coords) => write!(f, "{coords}"),
        }
    }
}

/// Short condition as reported upstream, e.g. `800 / Clear / clear sky`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub code: u32,
    pub main: String,
    pub description: String,
}

/// Current conditions for one coordinate at fetch time. Metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub country: Option<String>,
    pub coordinates: Coordinates,
    pub observation_time: DateTime<Utc>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub visibility_m: Option<u32>,
    pub wind_speed_mps: f64,
    pub wind_direction_deg: u16,
    pub cloudiness_pct: u8,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    pub condition: Option<Condition>,
}

impl WeatherSnapshot {
    pub fn visibility_km(&self) -> Option<f64> {
        self.visibility_m.map(|m| f64::from(m) / 1000.0)
    }
}
