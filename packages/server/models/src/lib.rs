#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the crime risk server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the pipeline types so the wire contract (`ZIP`, `CrimeCount`,
//! `PredictedCrimeLevel`) can evolve independently.

use crime_risk_analytics_models::{AreaPrediction, RiskReport};
use crime_risk_crime_models::RiskTier;
use crime_risk_geography_models::AreaCount;
use serde::{Deserialize, Serialize};

/// Message returned for any failed run. Details are only logged.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing the crime data.";

/// Body of `POST /api/risk`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRequest {
    /// URL of the incident CSV to download.
    pub crime_data_url: String,
    /// Optional single area to restrict the response to.
    #[serde(default)]
    pub pincode: Option<Pincode>,
}

/// An area filter, accepted either as a JSON string or number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pincode {
    /// `"85001"`
    Text(String),
    /// `85001`
    Number(u64),
}

impl Pincode {
    /// The filter as text, as the pipeline expects it.
    #[must_use]
    pub fn as_filter(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

/// Incident total for one area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiAreaCount {
    /// Postal code.
    #[serde(rename = "ZIP")]
    pub zip: String,
    /// Number of incidents.
    #[serde(rename = "CrimeCount")]
    pub crime_count: u64,
}

impl From<AreaCount> for ApiAreaCount {
    fn from(count: AreaCount) -> Self {
        Self {
            zip: count.area_code.to_string(),
            crime_count: count.total_incidents,
        }
    }
}

/// Tier label as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiCrimeLevel {
    /// `"LOW"`
    #[serde(rename = "LOW")]
    Low,
    /// `"MEDIUM"`
    #[serde(rename = "MEDIUM")]
    Medium,
    /// `"HIGH"`
    #[serde(rename = "HIGH")]
    High,
    /// `"VERY HIGH"`, with a space.
    #[serde(rename = "VERY HIGH")]
    VeryHigh,
}

impl From<RiskTier> for ApiCrimeLevel {
    fn from(tier: RiskTier) -> Self {
        match tier {
            RiskTier::Low => Self::Low,
            RiskTier::Medium => Self::Medium,
            RiskTier::High => Self::High,
            RiskTier::VeryHigh => Self::VeryHigh,
        }
    }
}

/// Predicted tier for one area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiAreaPrediction {
    /// Postal code.
    #[serde(rename = "ZIP")]
    pub zip: String,
    /// Predicted tier.
    #[serde(rename = "PredictedCrimeLevel")]
    pub predicted_crime_level: ApiCrimeLevel,
}

impl From<AreaPrediction> for ApiAreaPrediction {
    fn from(prediction: AreaPrediction) -> Self {
        Self {
            zip: prediction.area_code.to_string(),
            predicted_crime_level: prediction.tier.into(),
        }
    }
}

/// Payload of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRiskData {
    /// Incident totals per area.
    pub aggregated_crimes: Vec<ApiAreaCount>,
    /// Predicted tier per area.
    pub predicted_crime_levels: Vec<ApiAreaPrediction>,
}

impl From<RiskReport> for ApiRiskData {
    fn from(report: RiskReport) -> Self {
        Self {
            aggregated_crimes: report.area_counts.into_iter().map(Into::into).collect(),
            predicted_crime_levels: report.predictions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Response envelope for `POST /api/risk`.
///
/// `status` mirrors the outcome inside the body: `200` with `data`, or `500`
/// with `data: null` and a generic `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRiskResponse {
    /// `200` or `500`.
    pub status: u16,
    /// Present on success.
    pub data: Option<ApiRiskData>,
    /// Present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiRiskResponse {
    /// Wraps a successful report.
    #[must_use]
    pub fn success(report: RiskReport) -> Self {
        Self {
            status: 200,
            data: Some(report.into()),
            error: None,
        }
    }

    /// The generic failure envelope.
    #[must_use]
    pub fn failure() -> Self {
        Self {
            status: 500,
            data: None,
            error: Some(GENERIC_ERROR_MESSAGE.to_string()),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use crime_risk_geography_models::AreaCode;

    use super::*;

    #[test]
    fn success_envelope_shape() {
        let report = RiskReport {
            area_counts: vec![AreaCount {
                area_code: AreaCode(85001),
                total_incidents: 2,
            }],
            predictions: vec![AreaPrediction {
                area_code: AreaCode(85001),
                tier: RiskTier::VeryHigh,
            }],
        };
        let json = serde_json::to_value(ApiRiskResponse::success(report)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": 200,
                "data": {
                    "aggregatedCrimes": [{ "ZIP": "85001", "CrimeCount": 2 }],
                    "predictedCrimeLevels": [{ "ZIP": "85001", "PredictedCrimeLevel": "VERY HIGH" }],
                },
            })
        );
    }

    #[test]
    fn crime_levels_use_spaced_labels() {
        let labels: Vec<serde_json::Value> = RiskTier::all()
            .iter()
            .map(|tier| serde_json::to_value(ApiCrimeLevel::from(*tier)).unwrap())
            .collect();
        assert_eq!(labels, ["LOW", "MEDIUM", "HIGH", "VERY HIGH"]);
    }

    #[test]
    fn failure_envelope_shape() {
        let json = serde_json::to_value(ApiRiskResponse::failure()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": 500,
                "data": null,
                "error": GENERIC_ERROR_MESSAGE,
            })
        );
    }

    #[test]
    fn pincode_accepts_string_or_number() {
        let req: RiskRequest =
            serde_json::from_str(r#"{"crimeDataUrl":"http://x/a.csv","pincode":85001}"#).unwrap();
        assert_eq!(req.pincode.unwrap().as_filter(), "85001");

        let req: RiskRequest =
            serde_json::from_str(r#"{"crimeDataUrl":"http://x/a.csv","pincode":"85002"}"#).unwrap();
        assert_eq!(req.pincode.unwrap().as_filter(), "85002");

        let req: RiskRequest = serde_json::from_str(r#"{"crimeDataUrl":"http://x/a.csv"}"#).unwrap();
        assert!(req.pincode.is_none());
    }
}
