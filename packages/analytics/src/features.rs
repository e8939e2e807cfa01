//! Feature construction.
//!
//! Joins per-area class counts with per-area totals and converts the counts
//! into proportions of the total.

use std::collections::BTreeMap;

use crime_risk_analytics_models::AreaFeature;
use crime_risk_crime_models::{ClassifiedIncident, CrimeClass};
use crime_risk_geography_models::{AreaCode, AreaCount, ValidAreaSet};

use crate::PipelineError;
use crate::aggregate::{admit, aggregate};

/// Incident counts per [`CrimeClass`] within one area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassCounts {
    /// Assault incidents.
    pub assault: u64,
    /// Theft incidents.
    pub theft: u64,
    /// Other incidents.
    pub other: u64,
}

impl ClassCounts {
    /// Increments the counter for `class`.
    pub const fn record(&mut self, class: CrimeClass) {
        match class {
            CrimeClass::Assault => self.assault += 1,
            CrimeClass::Theft => self.theft += 1,
            CrimeClass::Other => self.other += 1,
        }
    }

    /// Sum of all three counters.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.assault + self.theft + self.other
    }
}

/// Counts each class per valid area.
///
/// # Errors
///
/// Returns [`PipelineError::MalformedRecord`] for a record without an area
/// field.
pub fn count_classes(
    records: &[ClassifiedIncident],
    valid_areas: &ValidAreaSet,
) -> Result<BTreeMap<AreaCode, ClassCounts>, PipelineError> {
    let mut counts: BTreeMap<AreaCode, ClassCounts> = BTreeMap::new();

    for (row, record) in records.iter().enumerate() {
        if let Some(code) = admit(row, record, valid_areas)? {
            counts.entry(code).or_default().record(record.crime_class);
        }
    }

    Ok(counts)
}

/// Divides each class count by `total_incidents`.
///
/// # Errors
///
/// Returns [`PipelineError::DivisionByZero`] when `total_incidents` is zero.
#[allow(clippy::cast_precision_loss)]
pub fn normalize(
    area_code: AreaCode,
    counts: ClassCounts,
    total_incidents: u64,
) -> Result<AreaFeature, PipelineError> {
    if total_incidents == 0 {
        return Err(PipelineError::DivisionByZero { area_code });
    }

    let total = total_incidents as f64;

    Ok(AreaFeature {
        area_code,
        total_incidents,
        assault_count: counts.assault,
        theft_count: counts.theft,
        other_count: counts.other,
        normalized_assault: counts.assault as f64 / total,
        normalized_theft: counts.theft as f64 / total,
        normalized_other: counts.other as f64 / total,
    })
}

/// Builds features for every area in `totals`.
///
/// `totals` is the output of [`aggregate`] over the same `records`, so
/// callers that already aggregated can avoid doing it twice.
///
/// # Errors
///
/// * [`PipelineError::MalformedRecord`] for a record without an area field
/// * [`PipelineError::IncompleteFeature`] if an area has no class counts or
///   its counts disagree with its total
/// * [`PipelineError::DivisionByZero`] if an area total is zero
pub fn build_features_from_totals(
    records: &[ClassifiedIncident],
    totals: &[AreaCount],
    valid_areas: &ValidAreaSet,
) -> Result<Vec<AreaFeature>, PipelineError> {
    let class_counts = count_classes(records, valid_areas)?;

    totals
        .iter()
        .map(|area| {
            let counts = class_counts.get(&area.area_code).copied().ok_or_else(|| {
                PipelineError::IncompleteFeature {
                    area_code: area.area_code,
                    message: "no class counts".to_string(),
                }
            })?;

            if area.total_incidents != 0 && counts.total() != area.total_incidents {
                return Err(PipelineError::IncompleteFeature {
                    area_code: area.area_code,
                    message: format!(
                        "class counts sum to {} but total is {}",
                        counts.total(),
                        area.total_incidents
                    ),
                });
            }

            normalize(area.area_code, counts, area.total_incidents)
        })
        .collect()
}

/// Aggregates `records` and builds features for every valid area.
///
/// # Errors
///
/// See [`build_features_from_totals`].
pub fn build_features(
    records: &[ClassifiedIncident],
    valid_areas: &ValidAreaSet,
) -> Result<Vec<AreaFeature>, PipelineError> {
    let totals = aggregate(records, valid_areas)?;
    build_features_from_totals(records, &totals, valid_areas)
}
