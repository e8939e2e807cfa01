//! Per-area incident counting.
//!
//! Only records whose area code coerces to a member of the
//! [`ValidAreaSet`] are counted. Output is keyed by the coerced code, so
//! `"85001"` and `" 85001 "` land in the same area.

use std::collections::BTreeMap;

use crime_risk_crime_models::ClassifiedIncident;
use crime_risk_geography_models::{AreaCode, AreaCount, ValidAreaSet};

use crate::PipelineError;

/// Returns the valid area code for `record`, or `None` if it should be
/// dropped.
///
/// # Errors
///
/// Returns [`PipelineError::MalformedRecord`] if the record has no area
/// field at all. A present but non-numeric value is simply filtered out.
pub fn admit(
    row: usize,
    record: &ClassifiedIncident,
    valid_areas: &ValidAreaSet,
) -> Result<Option<AreaCode>, PipelineError> {
    let raw = record
        .area_code
        .as_deref()
        .ok_or_else(|| PipelineError::MalformedRecord {
            row,
            message: "missing area code".to_string(),
        })?;

    Ok(valid_areas.admit(raw))
}

/// Counts incidents per valid area.
///
/// Areas without any matching record are absent from the output. The result
/// is ordered ascending by area code.
///
/// # Errors
///
/// Returns [`PipelineError::MalformedRecord`] for the first record without an
/// area field.
pub fn aggregate(
    records: &[ClassifiedIncident],
    valid_areas: &ValidAreaSet,
) -> Result<Vec<AreaCount>, PipelineError> {
    let mut totals: BTreeMap<AreaCode, u64> = BTreeMap::new();
    let mut dropped = 0_usize;

    for (row, record) in records.iter().enumerate() {
        match admit(row, record, valid_areas)? {
            Some(code) => *totals.entry(code).or_insert(0) += 1,
            None => dropped += 1,
        }
    }

    log::debug!(
        "Aggregated {} records into {} areas ({dropped} outside the valid set)",
        records.len(),
        totals.len(),
    );

    Ok(totals
        .into_iter()
        .map(|(area_code, total_incidents)| AreaCount {
            area_code,
            total_incidents,
        })
        .collect())
}
