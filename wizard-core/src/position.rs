use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::GeolocationError, model::Coordinates};

/// Where "use my current location" gets its answer from.
///
/// One request, two outcomes: a coordinate pair or an error. Callers do not
/// fall back to anything else.
#[async_trait]
pub trait PositionSource: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// A position known ahead of time (config file or command-line flags).
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl PositionSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.0)
    }
}

/// A source that always refuses, as when the user withholds permission.
#[derive(Debug, Clone, Copy)]
pub struct DeniedPosition;

#[async_trait]
impl PositionSource for DeniedPosition {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::PermissionDenied)
    }
}
