//! One-shot sampling of the tracked rate.
//!
//! [`Sampler::sample`] asks its [`RateProvider`] for the latest value and
//! stamps it with the current local date and time. Failures are split by
//! [`ErrorKind`]:
//!
//! - connectivity failures may be replaced by a synthetic rate, but only when
//!   the sampler was built with [`FallbackPolicy::Synthetic`];
//! - data-integrity failures are always returned to the caller.

use rand::Rng;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::models::observation::{Observation, Origin, Sample};
use crate::providers::{ErrorKind, ProviderError, RateProvider};

/// Inclusive range a synthetic rate is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateBand {
    low: f64,
    high: f64,
}

/// The band is not a finite, non-empty interval.
#[derive(Debug, Error, PartialEq)]
#[error("invalid rate band [{low}, {high}]: bounds must be finite and low <= high")]
pub struct InvalidBandError {
    pub low: f64,
    pub high: f64,
}

impl RateBand {
    /// Plausible CDI values, in percent.
    pub const CDI: RateBand = RateBand {
        low: 12.5,
        high: 13.8,
    };

    pub fn new(low: f64, high: f64) -> Result<Self, InvalidBandError> {
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(InvalidBandError { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn contains(&self, rate: f64) -> bool {
        (self.low..=self.high).contains(&rate)
    }
}

impl Default for RateBand {
    fn default() -> Self {
        Self::CDI
    }
}

/// What to do when the source cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FallbackPolicy {
    /// Report the connectivity error.
    #[default]
    Disabled,
    /// Substitute a rate drawn uniformly from the band.
    Synthetic(RateBand),
}

/// A sample could not be produced.
#[derive(Debug, Error)]
pub enum SampleError {
    /// The source could not be reached and no fallback was configured.
    #[error("rate source unreachable: {0}")]
    Unreachable(#[source] ProviderError),

    /// The source answered with unusable data.
    #[error("invalid rate data: {0}")]
    InvalidData(#[source] ProviderError),
}

impl SampleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SampleError::Unreachable(_) => ErrorKind::Connectivity,
            SampleError::InvalidData(_) => ErrorKind::DataIntegrity,
        }
    }

    pub fn into_inner(self) -> ProviderError {
        match self {
            SampleError::Unreachable(e) | SampleError::InvalidData(e) => e,
        }
    }
}

impl From<ProviderError> for SampleError {
    fn from(err: ProviderError) -> Self {
        match err.kind() {
            ErrorKind::Connectivity => SampleError::Unreachable(err),
            ErrorKind::DataIntegrity => SampleError::InvalidData(err),
        }
    }
}

/// Draws a synthetic rate from `band`, rounded to 4 decimal places.
///
/// The result is clamped back into the band so rounding can never push it out.
pub fn synthesize_rate<R: Rng + ?Sized>(rng: &mut R, band: RateBand) -> f64 {
    let raw = rng.random_range(band.low..=band.high);
    let rounded = (raw * 10_000.0).round() / 10_000.0;
    rounded.clamp(band.low, band.high)
}

/// Produces [`Sample`]s from a [`RateProvider`].
pub struct Sampler {
    provider: Box<dyn RateProvider>,
    fallback: FallbackPolicy,
}

impl Sampler {
    /// Creates a sampler with the fallback disabled.
    pub fn new(provider: Box<dyn RateProvider>) -> Self {
        Self {
            provider,
            fallback: FallbackPolicy::Disabled,
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Fetches one value and stamps it with the current local date and time.
    pub async fn sample(&self) -> Result<Sample, SampleError> {
        let provider = self.provider.name();

        match self.provider.fetch_latest().await {
            Ok(rate) => {
                let observation = Observation::now(rate);
                info!(provider, rate, "fetched live rate");
                Ok(Sample {
                    observation,
                    origin: Origin::Live,
                })
            }
            Err(err) => match (err.kind(), self.fallback) {
                (ErrorKind::Connectivity, FallbackPolicy::Synthetic(band)) => {
                    let rate = synthesize_rate(&mut rand::rng(), band);
                    warn!(
                        provider,
                        error = %err,
                        rate,
                        "rate source unreachable, substituting SYNTHETIC rate"
                    );
                    Ok(Sample {
                        observation: Observation::now(rate),
                        origin: Origin::Synthetic,
                    })
                }
                (kind, _) => {
                    error!(provider, %kind, error = %err, "failed to obtain rate");
                    Err(err.into())
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::providers::errors::{EmptyPayloadSnafu, StatusSnafu};

    enum Scripted {
        Rate(f64),
        Down,
        Empty,
    }

    #[async_trait]
    impl RateProvider for Scripted {
        async fn fetch_latest(&self) -> Result<f64, ProviderError> {
            match self {
                Scripted::Rate(r) => Ok(*r),
                Scripted::Down => StatusSnafu {
                    status: 503u16,
                    message: "down",
                }
                .fail(),
                Scripted::Empty => EmptyPayloadSnafu.fail(),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn live_rate_is_passed_through() {
        let sample = Sampler::new(Box::new(Scripted::Rate(13.65)))
            .sample()
            .await
            .unwrap();
        assert_eq!(sample.origin, Origin::Live);
        assert_eq!(sample.observation.rate, 13.65);
    }

    #[tokio::test]
    async fn fallback_is_off_by_default() {
        let sampler = Sampler::new(Box::new(Scripted::Down));
        assert_eq!(sampler.fallback(), FallbackPolicy::Disabled);

        let err = sampler.sample().await.unwrap_err();
        assert!(matches!(err, SampleError::Unreachable(_)));
        assert_eq!(err.kind(), ErrorKind::Connectivity);
    }

    #[tokio::test]
    async fn connectivity_failure_is_synthesized_when_enabled() {
        let sample = Sampler::new(Box::new(Scripted::Down))
            .with_fallback(FallbackPolicy::Synthetic(RateBand::CDI))
            .sample()
            .await
            .unwrap();
        assert!(sample.is_synthetic());
        assert!(RateBand::CDI.contains(sample.observation.rate));
    }

    #[tokio::test]
    async fn data_failure_is_never_synthesized() {
        let err = Sampler::new(Box::new(Scripted::Empty))
            .with_fallback(FallbackPolicy::Synthetic(RateBand::CDI))
            .sample()
            .await
            .unwrap_err();
        assert!(matches!(err, SampleError::InvalidData(_)));
        assert!(matches!(err.into_inner(), ProviderError::EmptyPayload { .. }));
    }

    #[test]
    fn band_rejects_inverted_and_non_finite_bounds() {
        assert!(RateBand::new(13.8, 12.5).is_err());
        assert!(RateBand::new(f64::NAN, 12.5).is_err());
        assert!(RateBand::new(12.5, f64::INFINITY).is_err());
        assert_eq!(RateBand::new(12.5, 13.8).unwrap(), RateBand::default());
    }

    #[test]
    fn degenerate_band_yields_its_only_value() {
        let band = RateBand::new(13.0, 13.0).unwrap();
        assert_eq!(synthesize_rate(&mut StdRng::seed_from_u64(7), band), 13.0);
    }

    proptest! {
        #[test]
        fn synthesized_rate_stays_in_band(seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let rate = synthesize_rate(&mut rng, RateBand::CDI);
            prop_assert!((12.5..=13.8).contains(&rate), "rate {rate} out of band");
            // rounded to at most 4 decimal places
            prop_assert!(((rate * 10_000.0).round() - rate * 10_000.0).abs() < 1e-6);
        }
    }
}
