use thiserror::Error;

use crate::chart::ChartError;
use crate::config::ConfigError;
use crate::io::dataset::DatasetError;
use crate::io::sink::StoreError;
use crate::providers::{ErrorKind, ProviderError, ProviderInitError};
use crate::sampler::SampleError;

/// The unified error type for the `cdi_collector` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP client for the rate source could not be built.
    #[error("Provider setup failed: {0}")]
    ProviderInit(#[from] ProviderInitError),

    /// A sample could not be produced.
    #[error(transparent)]
    Sample(#[from] SampleError),

    /// An observation could not be appended to the store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The stored dataset could not be read.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// The chart could not be produced.
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    /// An error related to configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// The failure class, for errors that came from the rate source.
    pub fn provider_kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Sample(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl From<ProviderError> for Error {
    fn from(err: ProviderError) -> Self {
        Error::Sample(SampleError::from(err))
    }
}
