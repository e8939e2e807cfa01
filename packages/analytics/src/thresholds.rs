//! Quartile thresholds over per-area incident totals.

use crime_risk_analytics_models::{AreaFeature, Thresholds};

use crate::PipelineError;

/// Picks the totals at indices `n/4`, `n/2` and `3n/4` of the ascending
/// sorted totals.
///
/// # Errors
///
/// Returns [`PipelineError::InsufficientData`] when `features` is empty.
pub fn derive_thresholds(features: &[AreaFeature]) -> Result<Thresholds, PipelineError> {
    if features.is_empty() {
        return Err(PipelineError::InsufficientData {
            message: "no areas available to derive thresholds".to_string(),
        });
    }

    let mut totals: Vec<u64> = features.iter().map(|f| f.total_incidents).collect();
    totals.sort_unstable();

    let n = totals.len();
    let thresholds = Thresholds {
        q1: totals[n / 4],
        q2: totals[n / 2],
        q3: totals[n * 3 / 4],
    };

    log::debug!(
        "Derived thresholds over {n} areas: q1={} q2={} q3={}",
        thresholds.q1,
        thresholds.q2,
        thresholds.q3
    );

    Ok(thresholds)
}
