//! Provider abstraction for rate sources.
//!
//! This module defines the [`RateProvider`] trait, a unified interface for
//! fetching the most recent value of the tracked series from any remote source.
//! The only concrete source today is the Banco Central do Brasil SGS API
//! ([`bcb_sgs`]).
//!
//! The trait is designed for async usage and supports dynamic dispatch
//! (`dyn RateProvider`) so the sampler does not care which source it talks to.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use cdi_collector::providers::{ProviderError, RateProvider};
//!
//! struct FixedRate;
//!
//! #[async_trait]
//! impl RateProvider for FixedRate {
//!     async fn fetch_latest(&self) -> Result<f64, ProviderError> {
//!         Ok(13.65)
//!     }
//!
//!     fn name(&self) -> &str {
//!         "fixed"
//!     }
//! }
//! ```

pub mod bcb_sgs;
pub mod errors;

use async_trait::async_trait;

pub use errors::{ErrorKind, ProviderError, ProviderInitError};

/// Trait for fetching the latest published value of a numeric series.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the single most recent data point and returns its value.
    ///
    /// # Returns
    ///
    /// * `Ok(f64)` - The value, already coerced to a finite float.
    /// * `Err(ProviderError)` - Classified through [`ProviderError::kind`].
    async fn fetch_latest(&self) -> Result<f64, ProviderError>;

    /// Short identifier used in log lines.
    fn name(&self) -> &str;
}
