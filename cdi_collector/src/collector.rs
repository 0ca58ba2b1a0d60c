//! Repeated sampling into a sink.
//!
//! [`collect`] is the error boundary of the sampling phase: every attempt is
//! isolated, failures are logged with their attempt number, and the loop
//! always runs to completion.

use std::num::NonZeroU32;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info};

use crate::io::sink::{DataSink, StoreError};
use crate::models::observation::Origin;
use crate::sampler::{SampleError, Sampler};

/// How many attempts to make and how long to pause between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectOptions {
    pub count: NonZeroU32,
    /// Pause between consecutive attempts. Not applied after the last one.
    pub interval: Duration,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            count: NonZeroU32::new(10).unwrap_or(NonZeroU32::MIN),
            interval: Duration::from_secs(2),
        }
    }
}

/// Tally of one [`collect`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectReport {
    pub attempted: u32,
    /// Attempts whose observation reached the sink, synthetic ones included.
    pub stored: u32,
    pub synthesized: u32,
    pub failed: u32,
}

impl CollectReport {
    pub fn all_failed(&self) -> bool {
        self.stored == 0
    }
}

#[derive(Debug, Error)]
enum AttemptError {
    #[error(transparent)]
    Sample(#[from] SampleError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Samples `options.count` times, writing every successful sample to `sink`.
///
/// Never fails: a failed attempt consumes its slot and the loop moves on.
pub async fn collect<S>(sampler: &Sampler, sink: &S, options: &CollectOptions) -> CollectReport
where
    S: DataSink + ?Sized,
{
    let total = options.count.get();
    info!(
        count = total,
        interval_ms = options.interval.as_millis() as u64,
        provider = sampler.provider_name(),
        "starting collection"
    );

    let mut report = CollectReport::default();
    for attempt in 1..=total {
        report.attempted += 1;

        match run_attempt(sampler, sink).await {
            Ok(origin) => {
                report.stored += 1;
                if origin == Origin::Synthetic {
                    report.synthesized += 1;
                }
                info!(attempt, total, %origin, "collection {attempt}/{total} done");
            }
            Err(err) => {
                report.failed += 1;
                error!(attempt, total, error = %err, "collection {attempt}/{total} failed");
            }
        }

        if attempt < total && !options.interval.is_zero() {
            tokio::time::sleep(options.interval).await;
        }
    }

    info!(
        attempted = report.attempted,
        stored = report.stored,
        synthesized = report.synthesized,
        failed = report.failed,
        "collection finished"
    );
    report
}

async fn run_attempt<S>(sampler: &Sampler, sink: &S) -> Result<Origin, AttemptError>
where
    S: DataSink + ?Sized,
{
    let sample = sampler.sample().await?;
    sink.write(&sample.observation).await?;
    Ok(sample.origin)
}
