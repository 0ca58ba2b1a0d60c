//! Append-only CSV store for [`Observation`]s.
//!
//! File layout: a `data,hora,taxa` header followed by one row per observation.
//! The header is written by whichever call creates the file, in the same
//! `write_all` as that call's row. Existence is decided by the `create_new`
//! open itself rather than by a separate check, so two writers cannot both
//! conclude that they own the header. A zero-byte file, left behind when a
//! creating write fails, also receives the header on its next append.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use snafu::ResultExt;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, warn};

use crate::io::sink::{DataSink, EncodeSnafu, OpenSnafu, StoreError, WriteSnafu};
use crate::models::observation::Observation;

/// Column names, in file order.
pub const HEADER: [&str; 3] = ["data", "hora", "taxa"];

#[derive(Serialize)]
struct ObservationRecord {
    data: String,
    hora: String,
    taxa: f64,
}

impl From<&Observation> for ObservationRecord {
    fn from(obs: &Observation) -> Self {
        Self {
            data: obs.date_string(),
            hora: obs.time_string(),
            taxa: obs.rate,
        }
    }
}

/// Whether an append created the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The file did not exist or was empty; header and row were written.
    Created,
    /// The file existed; only the row was written.
    Appended,
}

/// A CSV file that only ever grows.
#[derive(Debug, Clone)]
pub struct CsvAppendStore {
    path: PathBuf,
}

impl CsvAppendStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row, creating the file with its header if needed.
    ///
    /// Prior content is never read or rewritten. The file handle is dropped
    /// before returning, on success and on error alike.
    pub async fn append(&self, observation: &Observation) -> Result<AppendOutcome, StoreError> {
        let result = self.try_append(observation).await;
        match &result {
            Ok(outcome) => debug!(
                path = %self.path.display(),
                ?outcome,
                rate = observation.rate,
                "observation stored"
            ),
            Err(err) => error!(path = %self.path.display(), error = %err, "failed to store observation"),
        }
        result
    }

    async fn try_append(&self, observation: &Observation) -> Result<AppendOutcome, StoreError> {
        let row = encode_row(observation)?;

        match open_new(&self.path).await {
            Ok(file) => {
                let mut buf = encode_header()?;
                buf.extend_from_slice(&row);
                self.write_and_close(file, &buf).await?;
                Ok(AppendOutcome::Created)
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                let file = OpenOptions::new()
                    .append(true)
                    .open(&self.path)
                    .await
                    .context(OpenSnafu { path: &self.path })?;
                let len = file
                    .metadata()
                    .await
                    .context(OpenSnafu { path: &self.path })?
                    .len();

                // An earlier creating write failed before anything landed.
                if len == 0 {
                    warn!(path = %self.path.display(), "store is empty, writing header");
                    let mut buf = encode_header()?;
                    buf.extend_from_slice(&row);
                    self.write_and_close(file, &buf).await?;
                    return Ok(AppendOutcome::Created);
                }

                self.write_and_close(file, &row).await?;
                Ok(AppendOutcome::Appended)
            }
            Err(err) => Err(err).context(OpenSnafu { path: &self.path }),
        }
    }

    async fn write_and_close(&self, mut file: File, bytes: &[u8]) -> Result<(), StoreError> {
        file.write_all(bytes)
            .await
            .context(WriteSnafu { path: &self.path })?;
        file.flush().await.context(WriteSnafu { path: &self.path })?;
        file.sync_data()
            .await
            .context(WriteSnafu { path: &self.path })?;
        Ok(())
    }
}

#[async_trait]
impl DataSink for CsvAppendStore {
    type Output = AppendOutcome;

    async fn write(&self, observation: &Observation) -> Result<AppendOutcome, StoreError> {
        self.append(observation).await
    }
}

async fn open_new(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .append(true)
        .create_new(true)
        .open(path)
        .await
}

fn encode_header() -> Result<Vec<u8>, StoreError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(HEADER).context(EncodeSnafu)?;
    into_bytes(wtr)
}

fn encode_row(observation: &Observation) -> Result<Vec<u8>, StoreError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.serialize(ObservationRecord::from(observation))
        .context(EncodeSnafu)?;
    into_bytes(wtr)
}

fn into_bytes(wtr: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, StoreError> {
    wtr.into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
        .context(EncodeSnafu)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;

    fn obs(rate: f64) -> Observation {
        Observation::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            rate,
        )
    }

    #[test]
    fn row_has_three_fields_and_shortest_float() {
        let row = String::from_utf8(encode_row(&obs(13.25)).unwrap()).unwrap();
        assert_eq!(row, "2024-01-01,10:00:00,13.25\n");

        let row = String::from_utf8(encode_row(&obs(12.5013)).unwrap()).unwrap();
        assert_eq!(row, "2024-01-01,10:00:00,12.5013\n");
    }

    #[test]
    fn header_matches_column_order() {
        let header = String::from_utf8(encode_header().unwrap()).unwrap();
        assert_eq!(header, "data,hora,taxa\n");
    }

    #[tokio::test]
    async fn reports_creation_then_append() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvAppendStore::new(dir.path().join("taxa-cdi.csv"));

        assert_eq!(store.append(&obs(13.25)).await.unwrap(), AppendOutcome::Created);
        assert_eq!(store.append(&obs(13.30)).await.unwrap(), AppendOutcome::Appended);
    }

    #[tokio::test]
    async fn empty_existing_file_gets_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taxa-cdi.csv");
        std::fs::File::create(&path).unwrap();
        let store = CsvAppendStore::new(&path);

        assert_eq!(store.append(&obs(13.1)).await.unwrap(), AppendOutcome::Created);
        assert_eq!(store.append(&obs(13.2)).await.unwrap(), AppendOutcome::Appended);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "data,hora,taxa\n2024-01-01,10:00:00,13.1\n2024-01-01,10:00:00,13.2\n"
        );
    }
}
