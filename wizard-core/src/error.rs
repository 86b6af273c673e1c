use thiserror::Error;

/// Failure talking to the upstream weather service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        endpoint: &'static str,
        status: u16,
        /// The `message` field of the error body, when the service sent one.
        message: Option<String>,
    },

    #[error("failed to parse {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Message supplied by the upstream service, if any.
    pub fn upstream_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Why a weather lookup produced no snapshot.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Location not found: {query}")]
    NotFound { query: String },

    #[error("Weather unavailable: {0}")]
    Unavailable(#[source] ApiError),
}

impl FetchError {
    /// Upstream message worth showing to the user as-is.
    pub fn upstream_message(&self) -> Option<&str> {
        match self {
            FetchError::NotFound { .. } => None,
            FetchError::Unavailable(err) => err.upstream_message(),
        }
    }
}

/// Outcome of a failed device position request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location service unavailable")]
    Unavailable,
}
