//! Remote CSV download.

use std::time::Duration;

use crime_risk_crime_models::RawIncident;

use crate::{IngestError, parse_csv_bytes};

/// Upper bound on a single download, matching the five minute budget the
/// HTTP endpoint gets for a whole run.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Downloads and parses an incident CSV. URLs whose path ends in `.gz` are
/// decompressed before parsing.
///
/// # Errors
///
/// Returns an error if the request fails, the server answers with a
/// non-success status, or the body is not valid CSV.
pub async fn fetch_csv(url: &str) -> Result<Vec<RawIncident>, IngestError> {
    let client = reqwest::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()?;

    log::info!("Downloading incidents from {url}");

    let response = client.get(url).send().await?.error_for_status()?;
    let is_gzipped = response.url().path().ends_with(".gz");
    let bytes = response.bytes().await?;

    log::debug!("Downloaded {} bytes from {url}", bytes.len());

    parse_csv_bytes(&bytes, is_gzipped)
}
