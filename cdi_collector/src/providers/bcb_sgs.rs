//! Banco Central do Brasil SGS (Sistema Gerenciador de Séries Temporais) source.

pub mod params;
pub mod provider;
pub mod response;

pub use params::SgsParams;
pub use provider::BcbSgsProvider;
