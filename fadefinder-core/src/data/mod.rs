//! Loading gap events from disk.
//!
//! The file format is picked by extension. Both readers produce `RawRow`s
//! that are normalised and validated the same way, so a CSV and a Parquet
//! export of the same spreadsheet yield identical datasets.

pub mod csv_io;
pub mod parquet;
pub(crate) mod record;
pub mod schema;

pub use csv_io::{read_csv, write_csv};
pub use parquet::{read_parquet, write_parquet};
pub use schema::{GapEventSchema, SchemaError};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::dataset::{Dataset, InvalidRowError};
use crate::domain::GapEvent;
use record::RawRow;

/// How rows are normalised on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Divide PreVolume, Volume and MarketCap by one million and round
    /// them, plus GapSize, to two decimals.
    pub scale_to_millions: bool,
    /// Log and drop rows that fail to parse or validate instead of
    /// failing the whole load.
    pub skip_invalid: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            scale_to_millions: true,
            skip_invalid: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("parquet error: {0}")]
    Parquet(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    #[error("unsupported file format '{0}': expected .csv or .parquet")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Dataset(#[from] InvalidRowError),
}

/// Load and validate a dataset, choosing the reader by file extension.
pub fn load_dataset(path: &Path, opts: &LoadOptions) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let events = match ext.as_str() {
        "csv" => read_csv(path, opts)?,
        "parquet" | "pq" => read_parquet(path, opts)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    let dataset = Dataset::new(events)?;
    tracing::info!(
        path = %path.display(),
        rows = dataset.len(),
        stocks = dataset.stock_count(),
        fingerprint = %dataset.fingerprint(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Normalise and validate raw rows, honouring `skip_invalid`.
pub(crate) fn collect_events(
    rows: impl IntoIterator<Item = (usize, Result<RawRow, String>)>,
    opts: &LoadOptions,
) -> Result<Vec<GapEvent>, LoadError> {
    let mut events = Vec::new();
    let mut skipped = 0usize;

    for (row, raw) in rows {
        let converted = raw.and_then(|raw| {
            let event = raw.into_event(opts)?;
            event.validate().map_err(|e| e.to_string())?;
            Ok(event)
        });
        match converted {
            Ok(event) => events.push(event),
            Err(reason) if opts.skip_invalid => {
                tracing::warn!(row, %reason, "skipping invalid row");
                skipped += 1;
            }
            Err(reason) => return Err(LoadError::InvalidRow { row, reason }),
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, kept = events.len(), "invalid rows were dropped");
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::record::fixtures::raw_row;
    use super::*;

    #[test]
    fn invalid_rows_fail_by_default() {
        let mut bad = raw_row("BAD", "2021-06-08");
        bad.open_pre_high = 1.4;
        let rows = vec![(0, Ok(raw_row("OK", "2021-06-07"))), (1, Ok(bad))];
        let err = collect_events(rows, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidRow { row: 1, .. }));
    }

    #[test]
    fn invalid_rows_can_be_skipped() {
        let opts = LoadOptions {
            skip_invalid: true,
            ..LoadOptions::default()
        };
        let rows = vec![
            (0, Ok(raw_row("OK", "2021-06-07"))),
            (1, Err("unparseable".to_string())),
            (2, Ok(raw_row("", "2021-06-09"))),
            (3, Ok(raw_row("ALSO", "2021-06-10"))),
        ];
        let events = collect_events(rows, &opts).unwrap();
        let stocks: Vec<&str> = events.iter().map(|e| e.stock.as_str()).collect();
        assert_eq!(stocks, vec!["OK", "ALSO"]);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_dataset(Path::new("gaps.xlsx"), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }
}
