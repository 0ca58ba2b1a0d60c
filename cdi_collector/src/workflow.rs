//! Entry points used by the binary.
//!
//! Each function covers one user-visible operation and returns the crate
//! [`Error`], so the command layer only has to render results.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::chart::{ChartOptions, render_line_chart};
use crate::collector::{CollectOptions, CollectReport, collect};
use crate::config::AppConfig;
use crate::errors::Error;
use crate::io::dataset::load_series;
use crate::io::store::CsvAppendStore;
use crate::models::observation::Sample;
use crate::providers::bcb_sgs::BcbSgsProvider;
use crate::sampler::Sampler;

/// Builds a sampler over the SGS source described by `config`.
pub fn build_sampler(config: &AppConfig) -> Result<Sampler, Error> {
    let provider = BcbSgsProvider::new(config.sgs_params())?;
    Ok(Sampler::new(Box::new(provider)).with_fallback(config.fallback_policy()?))
}

/// Takes a single sample and appends it.
///
/// Unlike [`collect`], any failure is returned.
pub async fn extract_once(sampler: &Sampler, store: &CsvAppendStore) -> Result<Sample, Error> {
    let sample = sampler.sample().await?;
    store.append(&sample.observation).await?;
    Ok(sample)
}

/// Runs a batch collection into `store`.
pub async fn collect_into(
    sampler: &Sampler,
    store: &CsvAppendStore,
    options: &CollectOptions,
) -> CollectReport {
    collect(sampler, store, options).await
}

/// Loads the dataset at `store_path` and charts it as `<out_dir>/<name>.svg`.
pub fn plot_dataset(
    store_path: &Path,
    options: &ChartOptions,
    out_dir: &Path,
    name: &str,
) -> Result<PathBuf, Error> {
    let series = load_series(store_path)?;
    info!(path = %store_path.display(), rows = series.len(), "plotting dataset");
    Ok(render_line_chart(&series, options, out_dir, name)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartError;
    use crate::sampler::FallbackPolicy;

    #[test]
    fn sampler_follows_fallback_config() {
        let mut config = AppConfig::default();
        assert_eq!(build_sampler(&config).unwrap().fallback(), FallbackPolicy::Disabled);

        config.fallback.enabled = true;
        assert!(matches!(
            build_sampler(&config).unwrap().fallback(),
            FallbackPolicy::Synthetic(_)
        ));
    }

    #[test]
    fn plotting_header_only_store_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("taxa-cdi.csv");
        std::fs::write(&store, "data,hora,taxa\n").unwrap();

        let err = plot_dataset(&store, &ChartOptions::default(), dir.path(), "g").unwrap_err();
        assert!(matches!(err, Error::Chart(ChartError::EmptySeries)));
        assert!(!dir.path().join("g.svg").exists());
    }
}
