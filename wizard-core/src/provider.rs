use crate::{
    Config,
    error::ApiError,
    model::{Coordinates, LocationCandidate, WeatherSnapshot},
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Largest candidate list the geocoder is asked for.
pub const MAX_SUGGESTIONS: usize = 5;

/// The two upstream calls the app makes.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    /// Direct geocoding: place name to at most `limit` candidates, upstream order.
    async fn geocode(&self, query: &str, limit: usize) -> Result<Vec<LocationCandidate>, ApiError>;

    /// Current conditions at `coordinates`, metric units.
    async fn current_weather(&self, coordinates: Coordinates) -> Result<WeatherSnapshot, ApiError>;
}

/// Build the OpenWeatherMap client described by `config`.
///
/// A missing API key is not rejected here: the upstream service answers every
/// call with an authentication error, which surfaces as a normal fetch failure.
pub fn api_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherApi>> {
    let api_key = match config.api_key() {
        Some(key) => key.to_owned(),
        None => {
            tracing::warn!(
                "No API key configured; requests will be rejected upstream. \
                 Hint: run `wizard configure` or set WEATHER_API_KEY."
            );
            String::new()
        }
    };

    let client = OpenWeatherClient::with_base_url(api_key, config.api_base_url())?;
    Ok(Arc::new(client))
}
