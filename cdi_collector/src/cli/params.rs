use std::time::Duration;

use crate::config::AppConfig;

use super::commands::{Cli, CollectArgs, FallbackArgs};

pub fn parse_count(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("invalid count {raw:?}: {e}")),
    }
}

pub fn parse_interval(raw: &str) -> Result<f64, String> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|e| format!("invalid interval {raw:?}: {e}"))?;
    if secs < 0.0 || Duration::try_from_secs_f64(secs).is_err() {
        return Err(format!("interval must be a non-negative number of seconds, got {raw:?}"));
    }
    Ok(secs)
}

/// Applies `--store` and `--out-dir`.
pub fn apply_global_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(store) = &cli.store {
        config.store_path = store.clone();
    }
    if let Some(out_dir) = &cli.out_dir {
        config.out_dir = out_dir.clone();
    }
}

pub fn apply_collect_overrides(config: &mut AppConfig, args: &CollectArgs) {
    if let Some(count) = args.count {
        config.collect.count = count;
    }
    if let Some(interval) = args.interval {
        config.collect.interval_secs = interval;
    }
    apply_fallback_overrides(config, &args.fallback);
}

/// `--allow-synthetic` can only turn the fallback on, never off.
pub fn apply_fallback_overrides(config: &mut AppConfig, args: &FallbackArgs) {
    if args.allow_synthetic {
        config.fallback.enabled = true;
    }
}
