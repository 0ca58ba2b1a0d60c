use std::fmt;

use snafu::{Backtrace, Snafu};

/// Coarse classification of a [`ProviderError`].
///
/// Callers match on this instead of on individual variants to decide whether
/// a failure may be papered over (connectivity) or must be reported (data).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The source could not be reached or refused to answer.
    Connectivity,
    /// The source answered, but the payload is unusable.
    DataIntegrity,
}

impl ErrorKind {
    pub fn is_connectivity(self) -> bool {
        matches!(self, ErrorKind::Connectivity)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Connectivity => "connectivity",
            ErrorKind::DataIntegrity => "data integrity",
        })
    }
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `RateProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Request {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The API answered with a non-success status.
    #[snafu(display("API returned status {status}: {message}"))]
    Status {
        status: u16,
        message: String,
        backtrace: Backtrace,
    },

    /// The response body is not the expected JSON shape.
    #[snafu(display("Failed to decode API response: {source}"))]
    Decode {
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// The response decoded fine but held no data points.
    #[snafu(display("No CDI data found in API response"))]
    EmptyPayload { backtrace: Backtrace },

    /// The `valor` field could not be coerced to a finite number.
    #[snafu(display("Invalid rate value {value:?}: {message}"))]
    InvalidValue {
        value: String,
        message: String,
        backtrace: Backtrace,
    },
}

impl ProviderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::Request { .. } | ProviderError::Status { .. } => ErrorKind::Connectivity,
            ProviderError::Decode { .. }
            | ProviderError::EmptyPayload { .. }
            | ProviderError::InvalidValue { .. } => ErrorKind::DataIntegrity,
        }
    }
}
