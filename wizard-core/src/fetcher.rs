use std::sync::Arc;

use crate::{
    error::FetchError,
    model::{Coordinates, LocationQuery, WeatherSnapshot},
    provider::WeatherApi,
};

/// One fresh round trip per call: no caching, no retries.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    api: Arc<dyn WeatherApi>,
}

impl WeatherFetcher {
    pub fn new(api: Arc<dyn WeatherApi>) -> Self {
        Self { api }
    }

    pub async fn fetch(&self, query: &LocationQuery) -> Result<WeatherSnapshot, FetchError> {
        let coordinates = match query {
            LocationQuery::Text(text) => self.resolve_top(text).await?,
            LocationQuery::Resolved { coordinates, .. } | LocationQuery::Coordinates(coordinates) => {
                *coordinates
            }
        };

        tracing::debug!(%query, %coordinates, "fetching current weather");

        self.api.current_weather(coordinates).await.map_err(FetchError::Unavailable)
    }

    /// Best geocoding match for unresolved text.
    async fn resolve_top(&self, text: &str) -> Result<Coordinates, FetchError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FetchError::NotFound { query: String::new() });
        }

        let found = self.api.geocode(text, 1).await.map_err(FetchError::Unavailable)?;

        found
            .into_iter()
            .next()
            .map(|c| c.coordinates)
            .ok_or_else(|| FetchError::NotFound { query: text.to_string() })
    }
}
