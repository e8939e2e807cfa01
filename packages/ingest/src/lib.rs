#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CSV ingestion of raw incident records.
//!
//! Reads incident CSVs with `ZIP` and `UCR CRIME CATEGORY` header columns
//! into [`RawIncident`]s, from a reader, a local file, or a URL (optionally
//! gzip-compressed). Missing columns or cells are kept as `None` so that the
//! pipeline decides how to treat them.

pub mod download;

use std::io::Read;
use std::path::Path;

use crime_risk_crime_models::RawIncident;

pub use download::fetch_csv;

/// Header of the postal code column.
pub const ZIP_COLUMN: &str = "ZIP";

/// Header of the free-text category column.
pub const CATEGORY_COLUMN: &str = "UCR CRIME CATEGORY";

/// Errors that can occur while ingesting incident data.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input had no usable header row.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Parses incident records from CSV data.
///
/// Header names are matched after trimming. Rows may have fewer cells than
/// the header; absent cells become `None`.
///
/// # Errors
///
/// Returns an error if the CSV is malformed or has an empty header row.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<RawIncident>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(IngestError::Parse(
            "CSV file contains no header row".to_owned(),
        ));
    }

    let zip_idx = headers.iter().position(|h| h == ZIP_COLUMN);
    let category_idx = headers.iter().position(|h| h == CATEGORY_COLUMN);

    if zip_idx.is_none() {
        log::warn!("CSV has no {ZIP_COLUMN:?} column; every record will lack an area code");
    }
    if category_idx.is_none() {
        log::warn!("CSV has no {CATEGORY_COLUMN:?} column; every record will lack a category");
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .map(|value| value.trim().to_owned())
        };
        records.push(RawIncident {
            area_code: cell(zip_idx),
            category: cell(category_idx),
        });
    }

    log::debug!("Parsed {} incident records", records.len());

    Ok(records)
}

/// Parses incident records from an in-memory CSV string.
///
/// # Errors
///
/// See [`parse_csv`].
pub fn parse_csv_str(data: &str) -> Result<Vec<RawIncident>, IngestError> {
    parse_csv(data.as_bytes())
}

/// Parses incident records from raw bytes, decompressing first if
/// `is_gzipped` is set.
///
/// # Errors
///
/// Returns an error if decompression or parsing fails.
pub fn parse_csv_bytes(bytes: &[u8], is_gzipped: bool) -> Result<Vec<RawIncident>, IngestError> {
    if is_gzipped {
        let mut decoder = flate2::read::GzDecoder::new(bytes);
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed)?;
        log::debug!("Decompressed to {} bytes", decompressed.len());
        parse_csv(decompressed.as_slice())
    } else {
        parse_csv(bytes)
    }
}

/// Reads incident records from a local CSV file. Files ending in `.gz` are
/// decompressed.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_csv_file(path: &Path) -> Result<Vec<RawIncident>, IngestError> {
    log::info!("Reading incidents from {}", path.display());
    let bytes = std::fs::read(path)?;
    let is_gzipped = path.extension().is_some_and(|ext| ext == "gz");
    parse_csv_bytes(&bytes, is_gzipped)
}
