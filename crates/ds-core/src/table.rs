//! Dataset table ingest.
//!
//! The source of truth is a (usually gzip-compressed) CSV export with one
//! row per (dataset, parent) edge plus per-dataset scheduling metadata. It
//! is read exactly once per definition build; any schema or decode failure
//! aborts the whole build so a partial definition set is never published.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::Deserialize;

use ds_common::{Error, Result};

/// One row of the dataset table.
///
/// `END_DATE`/`START_DATE` are carried through for schema fidelity but play
/// no part in graph derivation; the partition window comes from
/// configuration instead.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetRow {
    #[serde(rename = "DATASET_NAME")]
    pub dataset_name: String,

    #[serde(rename = "PARENT_DATASET_NAME")]
    pub parent_dataset_name: String,

    #[serde(rename = "END_DATE")]
    pub end_date: Option<String>,

    #[serde(rename = "START_DATE")]
    pub start_date: Option<String>,

    #[serde(rename = "QUEUE_BINDING")]
    pub queue_binding: String,

    // The upstream export writes float-formatted integers once a column
    // contains NaNs, so both numeric columns parse as floats.
    #[serde(rename = "PARTITION_SECONDS")]
    pub partition_seconds: Option<f64>,

    #[serde(rename = "MAX_CONTIGUOUS_SECONDS")]
    pub max_contiguous_seconds: Option<f64>,
}

/// Read the dataset table from `path`, transparently decompressing a
/// `.gz` file.
pub fn read_table(path: &Path) -> Result<Vec<DatasetRow>> {
    let file = File::open(path)
        .map_err(|e| Error::Table(format!("cannot open {}: {e}", path.display())))?;
    let reader = BufReader::new(file);
    if path.extension().and_then(|ext| ext.to_str()) == Some("gz") {
        read_rows(GzDecoder::new(reader))
    } else {
        read_rows(reader)
    }
}

/// Deserialize dataset rows from raw CSV bytes.
pub fn read_rows(reader: impl Read) -> Result<Vec<DatasetRow>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for (idx, record) in csv_reader.deserialize::<DatasetRow>().enumerate() {
        // Header occupies line 1, first record line 2.
        let row = record.map_err(|e| Error::TableRow {
            line: idx + 2,
            reason: e.to_string(),
        })?;
        rows.push(row);
    }
    Ok(rows)
}
