use std::path::PathBuf;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::observation::Observation;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StoreError {
    /// The store file could not be created or opened for appending.
    #[snafu(display("Failed to open {}: {source}", path.display()))]
    Open {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// Writing or flushing the encoded row failed.
    #[snafu(display("Failed to write to {}: {source}", path.display()))]
    Write {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// The observation could not be encoded as a CSV row.
    #[snafu(display("Failed to encode observation: {source}"))]
    Encode {
        source: csv::Error,
        backtrace: Backtrace,
    },
}

#[async_trait]
pub trait DataSink: Send + Sync {
    /// The type of output returned after a successful write operation.
    ///
    /// A file sink reports whether the write created the file; other sinks
    /// may return row counts or nothing at all.
    type Output: Send;

    /// Persists one observation.
    ///
    /// # Arguments
    /// * `observation` - The complete observation to write.
    async fn write(&self, observation: &Observation) -> Result<Self::Output, StoreError>;
}
