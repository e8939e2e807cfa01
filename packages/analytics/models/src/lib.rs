#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-area feature, threshold and prediction types produced by the risk
//! pipeline.

use crime_risk_crime_models::RiskTier;
use crime_risk_geography_models::{AreaCode, AreaCount};
use serde::{Deserialize, Serialize};

/// Normalized `[assault, theft, other]` proportions for one area.
pub type FeatureVector = [f64; 3];

/// Class counts and their proportions for a single area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaFeature {
    /// The area.
    pub area_code: AreaCode,
    /// Total incidents in the area.
    pub total_incidents: u64,
    /// Incidents classified as assault.
    pub assault_count: u64,
    /// Incidents classified as theft.
    pub theft_count: u64,
    /// Incidents classified as other.
    pub other_count: u64,
    /// `assault_count / total_incidents`.
    pub normalized_assault: f64,
    /// `theft_count / total_incidents`.
    pub normalized_theft: f64,
    /// `other_count / total_incidents`.
    pub normalized_other: f64,
}

impl AreaFeature {
    /// The vector fed to the classifier.
    #[must_use]
    pub const fn vector(&self) -> FeatureVector {
        [
            self.normalized_assault,
            self.normalized_theft,
            self.normalized_other,
        ]
    }
}

/// Quartile cut points over per-area incident totals.
///
/// Always satisfies `q1 <= q2 <= q3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    /// 25th percentile.
    pub q1: u64,
    /// 50th percentile.
    pub q2: u64,
    /// 75th percentile.
    pub q3: u64,
}

/// Predicted tier for one area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaPrediction {
    /// The area.
    pub area_code: AreaCode,
    /// Tier returned by the classifier.
    pub tier: RiskTier,
}

/// Output of a single pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
    /// Incident totals per area, ascending by area code.
    pub area_counts: Vec<AreaCount>,
    /// Predicted tier per area, ascending by area code.
    pub predictions: Vec<AreaPrediction>,
}

impl RiskReport {
    /// Restricts both collections to entries for `area_code`.
    #[must_use]
    pub fn only(self, area_code: AreaCode) -> Self {
        Self {
            area_counts: self
                .area_counts
                .into_iter()
                .filter(|c| c.area_code == area_code)
                .collect(),
            predictions: self
                .predictions
                .into_iter()
                .filter(|p| p.area_code == area_code)
                .collect(),
        }
    }

    /// Whether the report contains no areas.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.area_counts.is_empty() && self.predictions.is_empty()
    }
}
