pub mod chart;
#[cfg(feature = "cli")]
pub mod cli;
pub mod collector;
pub mod config;
pub mod errors;
pub mod io;
pub mod models;
pub mod providers;
pub mod sampler;
pub mod workflow;

pub use errors::Error;
