//! In-memory stand-in for the upstream API, used by unit tests.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use crate::{
    error::ApiError,
    model::{Condition, Coordinates, LocationCandidate, WeatherSnapshot},
    provider::WeatherApi,
};

#[derive(Debug, Clone)]
pub enum GeoReply {
    Found(Vec<LocationCandidate>),
    Status(u16, Option<String>),
}

#[derive(Debug, Clone)]
pub enum WeatherReply {
    Snapshot(WeatherSnapshot),
    Status(u16, Option<String>),
}

#[derive(Debug)]
pub struct FakeApi {
    geocode: GeoReply,
    weather: WeatherReply,
    geocode_calls: AtomicUsize,
    weather_calls: AtomicUsize,
    last_limit: Mutex<Option<usize>>,
    last_coordinates: Mutex<Option<Coordinates>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            geocode: GeoReply::Found(Vec::new()),
            weather: WeatherReply::Snapshot(snapshot("Nowhere")),
            geocode_calls: AtomicUsize::new(0),
            weather_calls: AtomicUsize::new(0),
            last_limit: Mutex::new(None),
            last_coordinates: Mutex::new(None),
        }
    }
}

impl FakeApi {
    pub fn with_geocode(mut self, reply: GeoReply) -> Self {
        self.geocode = reply;
        self
    }

    pub fn with_weather(mut self, reply: WeatherReply) -> Self {
        self.weather = reply;
        self
    }

    pub fn geocode_calls(&self) -> usize {
        self.geocode_calls.load(Ordering::SeqCst)
    }

    pub fn weather_calls(&self) -> usize {
        self.weather_calls.load(Ordering::SeqCst)
    }

    pub fn last_geocode_limit(&self) -> Option<usize> {
        *self.last_limit.lock().unwrap()
    }

    pub fn last_weather_coordinates(&self) -> Option<Coordinates> {
        *self.last_coordinates.lock().unwrap()
    }
}

#[async_trait]
impl WeatherApi for FakeApi {
    async fn geocode(&self, _query: &str, limit: usize) -> Result<Vec<LocationCandidate>, ApiError> {
        self.geocode_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_limit.lock().unwrap() = Some(limit);

        match &self.geocode {
            GeoReply::Found(list) => Ok(list.clone()),
            GeoReply::Status(status, message) => Err(ApiError::Status {
                endpoint: "geocoding",
                status: *status,
                message: message.clone(),
            }),
        }
    }

    async fn current_weather(&self, coordinates: Coordinates) -> Result<WeatherSnapshot, ApiError> {
        self.weather_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_coordinates.lock().unwrap() = Some(coordinates);

        match &self.weather {
            WeatherReply::Snapshot(snap) => Ok(snap.clone()),
            WeatherReply::Status(status, message) => Err(ApiError::Status {
                endpoint: "current weather",
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

pub fn candidate(name: &str, country: &str) -> LocationCandidate {
    LocationCandidate {
        name: name.to_string(),
        state: None,
        country: country.to_string(),
        coordinates: Coordinates::new(name.len() as f64, country.len() as f64),
    }
}

pub fn snapshot(name: &str) -> WeatherSnapshot {
    WeatherSnapshot {
        location_name: name.to_string(),
        country: None,
        coordinates: Coordinates::new(0.0, 0.0),
        observation_time: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        temperature_c: 18.0,
        feels_like_c: 17.5,
        temp_min_c: 15.0,
        temp_max_c: 20.0,
        humidity_pct: 60,
        pressure_hpa: 1012,
        visibility_m: Some(10_000),
        wind_speed_mps: 4.1,
        wind_direction_deg: 180,
        cloudiness_pct: 20,
        sunrise: None,
        sunset: None,
        condition: Some(Condition {
            code: 801,
            main: "Clouds".to_string(),
            description: "few clouds".to_string(),
        }),
    }
}
