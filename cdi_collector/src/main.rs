use std::process::ExitCode;

use anyhow::{Context, Result};
use cdi_collector::chart::ChartOptions;
use cdi_collector::cli::commands::{Cli, Commands};
use cdi_collector::cli::params::{
    apply_collect_overrides, apply_fallback_overrides, apply_global_overrides,
};
use cdi_collector::collector::CollectReport;
use cdi_collector::config::{AppConfig, resolve_config};
use cdi_collector::io::store::CsvAppendStore;
use cdi_collector::workflow::{build_sampler, collect_into, extract_once, plot_dataset};
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let usage_error = err.use_stderr();
            // --help and --version land here too
            let _ = err.print();
            return if usage_error {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = resolve_config(cli.config.as_deref())?;
    apply_global_overrides(&mut config, &cli);

    match &cli.command {
        Commands::Collect(args) => {
            apply_collect_overrides(&mut config, args);
            let report = collect_with(&config).await?;
            print_summary(&config, &report);
        }
        Commands::Extract(args) => {
            apply_fallback_overrides(&mut config, args);
            config.validate().context("invalid configuration")?;
            let sampler = build_sampler(&config)?;
            let store = CsvAppendStore::new(&config.store_path);
            let sample = extract_once(&sampler, &store)
                .await
                .context("extraction failed")?;
            let obs = &sample.observation;
            println!(
                "{},{},{} ({})",
                obs.date_string(),
                obs.time_string(),
                obs.rate,
                sample.origin
            );
        }
        Commands::Plot { name } => {
            let path = plot(&config, name)?;
            println!("{}", path.display());
        }
        Commands::Analyze { collect, name } => {
            apply_collect_overrides(&mut config, collect);
            let report = collect_with(&config).await?;
            print_summary(&config, &report);
            let path = plot(&config, name)?;
            println!("analysis complete: chart written to {}", path.display());
        }
    }
    Ok(())
}

async fn collect_with(config: &AppConfig) -> Result<CollectReport> {
    config.validate().context("invalid configuration")?;
    let options = config.collect_options()?;
    let sampler = build_sampler(config)?;
    let store = CsvAppendStore::new(&config.store_path);
    Ok(collect_into(&sampler, &store, &options).await)
}

fn plot(config: &AppConfig, name: &str) -> Result<std::path::PathBuf> {
    plot_dataset(
        &config.store_path,
        &ChartOptions::default(),
        &config.out_dir,
        name,
    )
    .with_context(|| format!("could not chart {}", config.store_path.display()))
}

fn print_summary(config: &AppConfig, report: &CollectReport) {
    if report.all_failed() {
        tracing::warn!(attempted = report.attempted, "no observation was stored");
    }
    println!(
        "SUMMARY: {} attempted, {} stored ({} synthetic), {} failed -> {}",
        report.attempted,
        report.stored,
        report.synthesized,
        report.failed,
        config.store_path.display()
    );
}
