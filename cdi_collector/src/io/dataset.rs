//! Read side of the append store.
//!
//! Readers only scan the file. The header must name `hora` and `taxa`; any
//! other columns are ignored, and row order is kept as collection order.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use thiserror::Error;
use tracing::debug;

use crate::models::series::RateSeries;

/// Columns a dataset must carry to be charted.
pub const REQUIRED_COLUMNS: [&str; 2] = ["hora", "taxa"];

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset {} not found; run a collection first", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read dataset {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(
        "dataset {} must contain the columns 'hora' and 'taxa' (missing: {})",
        path.display(),
        missing.join(", ")
    )]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    #[error("dataset {} line {line}: invalid taxa value {value:?}", path.display())]
    InvalidRow {
        path: PathBuf,
        line: u64,
        value: String,
    },
}

/// Loads the `(hora, taxa)` series stored at `path`.
///
/// A file holding only the header yields an empty series.
pub fn load_series(path: impl AsRef<Path>) -> Result<RateSeries, DatasetError> {
    let path = path.as_ref();
    let read_err = |source: csv::Error| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DatasetError::NotFound {
            path: path.to_path_buf(),
        },
        _ => read_err(csv::Error::from(e)),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers().map_err(read_err)?.clone();
    let (hora_idx, taxa_idx) = required_columns(path, &headers)?;

    let mut series = RateSeries::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(read_err)?;
        // header is line 1
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(idx as u64 + 2);

        let raw = record.get(taxa_idx).unwrap_or_default();
        let rate = raw
            .parse::<f64>()
            .ok()
            .filter(|r| r.is_finite())
            .ok_or_else(|| DatasetError::InvalidRow {
                path: path.to_path_buf(),
                line,
                value: raw.to_string(),
            })?;
        series.push(record.get(hora_idx).unwrap_or_default(), rate);
    }

    debug!(path = %path.display(), rows = series.len(), "dataset loaded");
    Ok(series)
}

fn required_columns(path: &Path, headers: &StringRecord) -> Result<(usize, usize), DatasetError> {
    let position = |name: &str| headers.iter().position(|h| h == name);

    match (position("hora"), position("taxa")) {
        (Some(hora), Some(taxa)) => Ok((hora, taxa)),
        (hora, taxa) => {
            let missing = [("hora", hora), ("taxa", taxa)]
                .into_iter()
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| name.to_string())
                .collect();
            Err(DatasetError::MissingColumns {
                path: path.to_path_buf(),
                missing,
            })
        }
    }
}
