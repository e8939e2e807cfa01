//! End-to-end pipeline orchestration.

use crime_risk_analytics_models::{AreaPrediction, FeatureVector, RiskReport};
use crime_risk_crime_models::RawIncident;
use crime_risk_geography_models::{AreaCode, ValidAreaSet};

use crate::PipelineError;
use crate::aggregate::aggregate;
use crate::classifier::{RandomForestRiskClassifier, RiskClassifier};
use crate::classify::classify_all;
use crate::config::PipelineConfig;
use crate::features::build_features_from_totals;
use crate::labels::assign_tiers;
use crate::thresholds::derive_thresholds;

/// Runs the pipeline with a fresh random forest built from `config`.
///
/// # Errors
///
/// Returns the first error raised by any stage; see [`run_with`].
pub fn run(
    records: Vec<RawIncident>,
    filter_area_code: Option<&str>,
    config: &PipelineConfig,
) -> Result<RiskReport, PipelineError> {
    let mut classifier = RandomForestRiskClassifier::new(config.classifier);
    run_with(
        &mut classifier,
        records,
        filter_area_code,
        &config.valid_areas(),
    )
}

/// Runs the pipeline with the given classifier.
///
/// Classifies every record, aggregates once, builds features, derives
/// thresholds, labels each area, trains `classifier` on those labels and
/// predicts a tier for every area. If `filter_area_code` is non-blank, both
/// output collections are then restricted to that area; an unknown or
/// non-numeric filter yields an empty report.
///
/// # Errors
///
/// * [`PipelineError::MalformedRecord`] if a record lacks a field
/// * [`PipelineError::InsufficientData`] if no record falls in a valid area
/// * any error raised by `classifier`
pub fn run_with<C: RiskClassifier + ?Sized>(
    classifier: &mut C,
    records: Vec<RawIncident>,
    filter_area_code: Option<&str>,
    valid_areas: &ValidAreaSet,
) -> Result<RiskReport, PipelineError> {
    let record_count = records.len();
    let classified = classify_all(records)?;

    let area_counts = aggregate(&classified, valid_areas)?;
    let features = build_features_from_totals(&classified, &area_counts, valid_areas)?;
    let thresholds = derive_thresholds(&features)?;
    let labels = assign_tiers(&features, &thresholds);

    let vectors: Vec<FeatureVector> = features.iter().map(|f| f.vector()).collect();
    classifier.train(&vectors, &labels)?;
    let tiers = classifier.predict(&vectors)?;

    if tiers.len() != features.len() {
        return Err(PipelineError::Classifier(format!(
            "expected {} predictions, got {}",
            features.len(),
            tiers.len()
        )));
    }

    let predictions = features
        .iter()
        .zip(tiers)
        .map(|(f, tier)| AreaPrediction {
            area_code: f.area_code,
            tier,
        })
        .collect();

    log::info!(
        "Predicted risk tiers for {} areas from {record_count} records",
        features.len()
    );

    let report = RiskReport {
        area_counts,
        predictions,
    };

    Ok(match filter_area_code.map(str::trim).filter(|s| !s.is_empty()) {
        None => report,
        Some(raw) => match AreaCode::coerce(raw) {
            Some(code) => report.only(code),
            None => {
                log::debug!("Filter {raw:?} is not an area code; returning empty report");
                RiskReport::default()
            }
        },
    })
}

#[cfg(test)]
mod tests {
    use crime_risk_crime_models::RiskTier;

    use super::*;
    use crate::config::ClassifierConfig;

    /// Answers with the labels it was trained on, in training order.
    #[derive(Default)]
    struct EchoClassifier {
        labels: Option<Vec<RiskTier>>,
    }

    impl RiskClassifier for EchoClassifier {
        fn train(
            &mut self,
            _features: &[FeatureVector],
            labels: &[RiskTier],
        ) -> Result<(), PipelineError> {
            self.labels = Some(labels.to_vec());
            Ok(())
        }

        fn predict(&self, features: &[FeatureVector]) -> Result<Vec<RiskTier>, PipelineError> {
            let labels = self.labels.as_ref().ok_or(PipelineError::ModelNotTrained)?;
            Ok(labels.iter().copied().cycle().take(features.len()).collect())
        }
    }

    fn mock_records() -> Vec<RawIncident> {
        [
            ("85001", "MURDER"),
            ("85001", "AGGRAVATED ASSAULT"),
            ("85002", "BURGLARY"),
            ("85002", "LARCENY"),
            ("85002", "LARCENY"),
            ("85003", "MOTOR VEHICLE"),
            ("85003", "MOTOR VEHICLE"),
            ("85004", "ROBBERY"),
            ("85005", "RAPE"),
            ("85281", "BURGLARY"),
            ("85281", "AGGRAVATED ASSAULT"),
            ("85281", "LARCENY"),
        ]
        .into_iter()
        .map(|(zip, cat)| RawIncident::new(zip, cat))
        .collect()
    }

    #[test]
    fn mock_dataset_counts_and_labels() {
        let mut classifier = EchoClassifier::default();
        let report =
            run_with(&mut classifier, mock_records(), None, &ValidAreaSet::phoenix()).unwrap();

        let counts: Vec<(u32, u64)> = report
            .area_counts
            .iter()
            .map(|c| (c.area_code.value(), c.total_incidents))
            .collect();
        assert_eq!(
            counts,
            vec![
                (85001, 2),
                (85002, 3),
                (85003, 2),
                (85004, 1),
                (85005, 1),
                (85281, 3)
            ]
        );

        // sorted totals [1, 1, 2, 2, 3, 3] -> q1 = 1, q2 = 2, q3 = 3
        let tiers: Vec<(u32, RiskTier)> = report
            .predictions
            .iter()
            .map(|p| (p.area_code.value(), p.tier))
            .collect();
        assert_eq!(
            tiers,
            vec![
                (85001, RiskTier::Medium),
                (85002, RiskTier::High),
                (85003, RiskTier::Medium),
                (85004, RiskTier::Low),
                (85005, RiskTier::Low),
                (85281, RiskTier::High),
            ]
        );
    }

    #[test]
    fn filter_is_a_subset_of_unfiltered_run() {
        let config = PipelineConfig {
            classifier: ClassifierConfig {
                n_estimators: 10,
                ..ClassifierConfig::default()
            },
            ..PipelineConfig::default()
        };
        let full = run(mock_records(), None, &config).unwrap();

        for code in ["85001", "85002", "85281", "90210"] {
            let filtered = run(mock_records(), Some(code), &config).unwrap();
            let expected = full.clone().only(AreaCode::coerce(code).unwrap());
            assert_eq!(filtered, expected, "filter {code}");
        }
    }

    #[test]
    fn blank_filter_means_no_filter() {
        let mut a = EchoClassifier::default();
        let mut b = EchoClassifier::default();
        let valid = ValidAreaSet::phoenix();
        let unfiltered = run_with(&mut a, mock_records(), None, &valid).unwrap();
        let blank = run_with(&mut b, mock_records(), Some("  "), &valid).unwrap();
        assert_eq!(unfiltered, blank);
    }

    #[test]
    fn non_numeric_filter_is_empty_not_error() {
        let mut classifier = EchoClassifier::default();
        let report = run_with(
            &mut classifier,
            mock_records(),
            Some("downtown"),
            &ValidAreaSet::phoenix(),
        )
        .unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn no_valid_areas_is_insufficient_data() {
        let records = vec![RawIncident::new("90210", "MURDER")];
        let err = run(records, None, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::InsufficientData { .. }));
    }

    #[test]
    fn malformed_record_aborts_run() {
        let mut records = mock_records();
        records.push(RawIncident {
            area_code: Some("85001".to_string()),
            category: None,
        });
        let err = run(records, None, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedRecord { row: 12, .. }));
    }

    #[test]
    fn forest_run_is_reproducible() {
        let config = PipelineConfig::default();
        let a = run(mock_records(), None, &config).unwrap();
        let b = run(mock_records(), None, &config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.predictions.len(), 6);
    }
}
