use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::ApiError,
    model::{Condition, Coordinates, LocationCandidate, WeatherSnapshot},
};

use super::WeatherApi;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const GEOCODING_PATH: &str = "geo/1.0/direct";
const CURRENT_WEATHER_PATH: &str = "data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    geocoding_url: Url,
    current_weather_url: Url,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at another host, e.g. a local mock server.
    pub fn with_base_url(api_key: String, base_url: &str) -> anyhow::Result<Self> {
        // Url::join drops the last path segment unless the base ends with '/'.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base = Url::parse(&normalized)
            .with_context(|| format!("Invalid API base URL: {base_url}"))?;

        Ok(Self {
            api_key,
            geocoding_url: base.join(GEOCODING_PATH)?,
            current_weather_url: base.join(CURRENT_WEATHER_PATH)?,
            http: Client::new(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: &Url,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        tracing::debug!(endpoint, %url, "sending request");

        let res = self
            .http
            .get(url.clone())
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| ApiError::Transport { endpoint, source })?;

        if !status.is_success() {
            let message = upstream_message(&body);
            tracing::warn!(
                endpoint,
                status = status.as_u16(),
                body = %truncate_body(&body),
                "upstream request failed"
            );
            return Err(ApiError::Status { endpoint, status: status.as_u16(), message });
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Decode { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    name: String,
    state: Option<String>,
    country: String,
    lat: f64,
    lon: f64,
}

impl From<OwGeoEntry> for LocationCandidate {
    fn from(e: OwGeoEntry) -> Self {
        LocationCandidate {
            name: e.name,
            state: e.state,
            country: e.country,
            coordinates: Coordinates::new(e.lat, e.lon),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u32,
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    #[serde(default)]
    deg: u16,
}

#[derive(Debug, Deserialize, Default)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Deserialize, Default)]
struct OwSys {
    country: Option<String>,
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    coord: OwCoord,
    #[serde(default)]
    name: String,
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    clouds: OwClouds,
    visibility: Option<u32>,
    #[serde(default)]
    sys: OwSys,
}

impl From<OwCurrentResponse> for WeatherSnapshot {
    fn from(r: OwCurrentResponse) -> Self {
        let condition = r.weather.into_iter().next().map(|w| Condition {
            code: w.id,
            main: w.main,
            description: w.description,
        });

        WeatherSnapshot {
            location_name: r.name,
            country: r.sys.country,
            coordinates: Coordinates::new(r.coord.lat, r.coord.lon),
            observation_time: unix_to_utc(r.dt).unwrap_or_else(Utc::now),
            temperature_c: r.main.temp,
            feels_like_c: r.main.feels_like,
            temp_min_c: r.main.temp_min,
            temp_max_c: r.main.temp_max,
            humidity_pct: r.main.humidity,
            pressure_hpa: r.main.pressure,
            visibility_m: r.visibility,
            wind_speed_mps: r.wind.speed,
            wind_direction_deg: r.wind.deg,
            cloudiness_pct: r.clouds.all,
            sunrise: r.sys.sunrise.and_then(unix_to_utc),
            sunset: r.sys.sunset.and_then(unix_to_utc),
            condition,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
    async fn geocode(&self, query: &str, limit: usize) -> Result<Vec<LocationCandidate>, ApiError> {
        let entries: Vec<OwGeoEntry> = self
            .get_json(
                "geocoding",
                &self.geocoding_url,
                &[("q", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;

        tracing::debug!(query, found = entries.len(), "geocoding finished");

        Ok(entries.into_iter().take(limit).map(LocationCandidate::from).collect())
    }

    async fn current_weather(&self, coordinates: Coordinates) -> Result<WeatherSnapshot, ApiError> {
        let parsed: OwCurrentResponse = self
            .get_json(
                "current weather",
                &self.current_weather_url,
                &[
                    ("lat", coordinates.latitude.to_string()),
                    ("lon", coordinates.longitude.to_string()),
                    ("units", "metric".to_string()),
                ],
            )
            .await?;

        Ok(parsed.into())
    }
}

fn upstream_message(body: &str) -> Option<String> {
    serde_json::from_str::<OwErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_message_reads_error_body() {
        let body = r#"{"cod":401,"message":"Invalid API key"}"#;
        assert_eq!(upstream_message(body).as_deref(), Some("Invalid API key"));
    }

    #[test]
    fn upstream_message_ignores_non_json_bodies() {
        assert_eq!(upstream_message("<html>bad gateway</html>"), None);
        assert_eq!(upstream_message(r#"{"message":""}"#), None);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        assert_eq!(truncate_body(&long).chars().count(), 200);
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn current_response_maps_to_snapshot() {
        let json = serde_json::json!({
            "coord": {"lon": 2.35, "lat": 48.85},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "main": {"temp": 21.5, "feels_like": 21.0, "temp_min": 19.0, "temp_max": 23.2,
                     "pressure": 1015, "humidity": 40},
            "visibility": 10000,
            "wind": {"speed": 3.6, "deg": 250},
            "clouds": {"all": 0},
            "dt": 1_700_000_000,
            "sys": {"country": "FR", "sunrise": 1_699_990_000, "sunset": 1_700_025_000},
            "name": "Paris"
        });

        let parsed: OwCurrentResponse = serde_json::from_value(json).unwrap();
        let snap = WeatherSnapshot::from(parsed);

        assert_eq!(snap.location_name, "Paris");
        assert_eq!(snap.country.as_deref(), Some("FR"));
        assert_eq!(snap.temp_max_c, 23.2);
        assert_eq!(snap.wind_direction_deg, 250);
        assert_eq!(snap.visibility_km(), Some(10.0));
        assert_eq!(snap.sunrise.map(|t| t.timestamp()), Some(1_699_990_000));
        assert_eq!(snap.condition.unwrap().main, "Clear");
    }

    #[test]
    fn with_base_url_normalizes_trailing_slash() {
        let client = OpenWeatherClient::with_base_url("k".into(), "http://localhost:1234/owm").unwrap();
        assert_eq!(client.current_weather_url.as_str(), "http://localhost:1234/owm/data/2.5/weather");
        assert_eq!(client.geocoding_url.as_str(), "http://localhost:1234/owm/geo/1.0/direct");
    }
}
