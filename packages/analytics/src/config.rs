//! Pipeline configuration.
//!
//! The valid-area allow-list and classifier hyperparameters are read from
//! TOML. A default config is baked into the binary via [`include_str!`];
//! `CRIME_RISK_CONFIG` points at a replacement file.

use std::path::Path;

use crime_risk_geography_models::{AreaRange, PHOENIX_AREA_RANGES, ValidAreaSet};
use serde::{Deserialize, Serialize};

use crate::PipelineError;

/// Environment variable naming a TOML config file to use instead of the
/// embedded default.
pub const CONFIG_ENV_VAR: &str = "CRIME_RISK_CONFIG";

/// TOML config embedded at compile time.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Random forest hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Number of trees in the forest.
    pub n_estimators: u16,
    /// Seed for bootstrap sampling and feature selection.
    pub seed: u64,
    /// Optional cap on tree depth.
    pub max_depth: Option<u16>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            seed: 42,
            max_depth: None,
        }
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Inclusive postal code ranges admitted into aggregation.
    pub areas: Vec<AreaRange>,
    /// Classifier hyperparameters.
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            areas: PHOENIX_AREA_RANGES.to_vec(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// The allow-list described by [`Self::areas`].
    #[must_use]
    pub fn valid_areas(&self) -> ValidAreaSet {
        ValidAreaSet::new(self.areas.clone())
    }

    /// Rejects empty or inverted ranges and a zero-tree forest.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.areas.is_empty() {
            return Err(PipelineError::Config(
                "at least one area range is required".to_string(),
            ));
        }
        if let Some(range) = self.areas.iter().find(|r| !r.is_well_formed()) {
            return Err(PipelineError::Config(format!(
                "area range {}-{} has start after end",
                range.start, range.end
            )));
        }
        if self.classifier.n_estimators == 0 {
            return Err(PipelineError::Config(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parses and validates a TOML config string.
///
/// # Errors
///
/// Returns [`PipelineError::Config`] if the TOML is malformed or fails
/// [`PipelineConfig::validate`].
pub fn parse_config_toml(toml_str: &str) -> Result<PipelineConfig, PipelineError> {
    let config: PipelineConfig =
        toml::de::from_str(toml_str).map_err(|e| PipelineError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Reads and parses a TOML config file.
///
/// # Errors
///
/// Returns [`PipelineError::Config`] if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<PipelineConfig, PipelineError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        PipelineError::Config(format!("failed to read {}: {e}", path.display()))
    })?;
    parse_config_toml(&contents)
}

/// Loads the file named by [`CONFIG_ENV_VAR`], falling back to the embedded
/// default.
///
/// # Errors
///
/// Returns [`PipelineError::Config`] if the selected config cannot be read
/// or parsed.
pub fn load_from_env() -> Result<PipelineConfig, PipelineError> {
    match std::env::var(CONFIG_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => {
            log::info!("Loading pipeline config from {path}");
            load_config(Path::new(path.trim()))
        }
        _ => parse_config_toml(DEFAULT_CONFIG_TOML),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_default_matches_code_default() {
        let parsed = parse_config_toml(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(parsed, PipelineConfig::default());
    }

    #[test]
    fn classifier_section_is_optional() {
        let config = parse_config_toml(
            r"
            [[areas]]
            start = 10001
            end = 10005
            ",
        )
        .unwrap();
        assert_eq!(config.classifier, ClassifierConfig::default());
        assert!(config.valid_areas().admit("10003").is_some());
        assert!(config.valid_areas().admit("85001").is_none());
    }

    #[test]
    fn partial_classifier_section_keeps_defaults() {
        let config = parse_config_toml(
            r"
            [[areas]]
            start = 1
            end = 2

            [classifier]
            seed = 7
            max_depth = 4
            ",
        )
        .unwrap();
        assert_eq!(config.classifier.seed, 7);
        assert_eq!(config.classifier.n_estimators, 100);
        assert_eq!(config.classifier.max_depth, Some(4));
    }

    #[test]
    fn rejects_inverted_range() {
        let err = parse_config_toml(
            r"
            [[areas]]
            start = 85099
            end = 85001
            ",
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn rejects_zero_trees_and_missing_areas() {
        let err = parse_config_toml(
            r"
            [[areas]]
            start = 1
            end = 2

            [classifier]
            n_estimators = 0
            ",
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));

        assert!(parse_config_toml("areas = []").is_err());
        assert!(parse_config_toml("not toml at all [").is_err());
    }
}
