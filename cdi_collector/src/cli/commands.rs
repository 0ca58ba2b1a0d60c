use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::params::{parse_count, parse_interval};

/// Default chart name for `analyze`.
pub const DEFAULT_ANALYSIS_NAME: &str = "analise-cdi";

#[derive(Debug, Parser)]
#[command(
    name = "cdi-collector",
    author,
    version,
    about = "Collects the CDI rate into a CSV file and charts it"
)]
pub struct Cli {
    /// Path to a TOML config file (defaults to $CDI_COLLECTOR_CONFIG)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// CSV file observations are appended to and read from
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Directory charts are written to
    #[arg(long, global = true, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sample the rate repeatedly, appending every observation
    Collect(CollectArgs),

    /// Sample the rate once and append it; any failure is fatal
    Extract(FallbackArgs),

    /// Chart the stored dataset as <NAME>.svg (SVG, not PNG: text needs no system fonts)
    Plot {
        /// Chart file name, without extension
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Collect, then chart the result
    Analyze {
        #[command(flatten)]
        collect: CollectArgs,

        /// Chart file name, without extension
        #[arg(value_name = "NAME", default_value = DEFAULT_ANALYSIS_NAME)]
        name: String,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct CollectArgs {
    /// Number of sampling attempts
    #[arg(short = 'n', long, value_parser = parse_count)]
    pub count: Option<u32>,

    /// Seconds to wait between attempts
    #[arg(short, long, value_name = "SECS", value_parser = parse_interval)]
    pub interval: Option<f64>,

    #[command(flatten)]
    pub fallback: FallbackArgs,
}

#[derive(Debug, Clone, Default, Args)]
pub struct FallbackArgs {
    /// Record a SYNTHETIC rate when the source is unreachable
    #[arg(long)]
    pub allow_synthetic: bool,
}
