//! Turning what the user typed, or where the device is, into coordinates.

use std::{sync::Arc, vec};

use crate::{
    error::{ApiError, GeolocationError},
    model::{Coordinates, LocationCandidate},
    position::PositionSource,
    provider::{MAX_SUGGESTIONS, WeatherApi},
};

/// Candidates for one search fragment, consumed once.
///
/// An empty sequence means either the fragment was blank (check
/// [`Suggestions::offer_current_position`]), the place is unknown, or the
/// lookup failed (check [`Suggestions::error`]).
#[derive(Debug)]
pub struct Suggestions {
    candidates: vec::IntoIter<LocationCandidate>,
    offer_current_position: bool,
    error: Option<ApiError>,
}

impl Suggestions {
    fn current_position() -> Self {
        Self { candidates: Vec::new().into_iter(), offer_current_position: true, error: None }
    }

    fn found(mut candidates: Vec<LocationCandidate>) -> Self {
        candidates.truncate(MAX_SUGGESTIONS);
        Self { candidates: candidates.into_iter(), offer_current_position: false, error: None }
    }

    fn failed(error: ApiError) -> Self {
        Self {
            candidates: Vec::new().into_iter(),
            offer_current_position: false,
            error: Some(error),
        }
    }

    /// True when the fragment was blank and the caller should offer
    /// "use my current location" instead.
    pub fn offer_current_position(&self) -> bool {
        self.offer_current_position
    }

    /// The recoverable lookup failure, if any.
    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<ApiError> {
        self.error.take()
    }
}

impl Iterator for Suggestions {
    type Item = LocationCandidate;

    fn next(&mut self) -> Option<Self::Item> {
        self.candidates.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.candidates.size_hint()
    }
}

impl ExactSizeIterator for Suggestions {}

#[derive(Debug, Clone)]
pub struct LocationResolver {
    api: Arc<dyn WeatherApi>,
    position: Option<Arc<dyn PositionSource>>,
}

impl LocationResolver {
    pub fn new(api: Arc<dyn WeatherApi>) -> Self {
        Self { api, position: None }
    }

    pub fn with_position_source(mut self, source: Arc<dyn PositionSource>) -> Self {
        self.position = Some(source);
        self
    }

    pub fn supports_geolocation(&self) -> bool {
        self.position.is_some()
    }

    /// Up to five candidates for `fragment`, in the order the geocoder ranked them.
    pub async fn suggest(&self, fragment: &str) -> Suggestions {
        let term = fragment.trim();
        if term.is_empty() {
            return Suggestions::current_position();
        }

        match self.api.geocode(term, MAX_SUGGESTIONS).await {
            Ok(candidates) => Suggestions::found(candidates),
            Err(err) => {
                tracing::warn!(term, error = %err, "location lookup failed");
                Suggestions::failed(err)
            }
        }
    }

    /// Ask the device where it is. Without a position source this is
    /// [`GeolocationError::Unavailable`].
    pub async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        match &self.position {
            Some(source) => source.current_position().await,
            None => Err(GeolocationError::Unavailable),
        }
    }
}
