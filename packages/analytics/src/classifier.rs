//! Risk classifier adapter.
//!
//! The pipeline only needs a supervised multi-class classifier that can be
//! trained on `[assault, theft, other]` proportion vectors labelled with a
//! [`RiskTier`] and then asked for a tier per vector. [`RiskClassifier`] is
//! that seam; [`RandomForestRiskClassifier`] is the default implementation,
//! backed by `smartcore`'s seeded random forest.

use crime_risk_analytics_models::FeatureVector;
use crime_risk_crime_models::RiskTier;
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::PipelineError;
use crate::config::ClassifierConfig;

/// A supervised classifier over normalized feature vectors.
pub trait RiskClassifier {
    /// Fits the model to `features` labelled with `labels`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input fails validation or the underlying
    /// model cannot be fitted.
    fn train(
        &mut self,
        features: &[FeatureVector],
        labels: &[RiskTier],
    ) -> Result<(), PipelineError>;

    /// Predicts one tier per feature vector.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ModelNotTrained`] if called before
    /// [`RiskClassifier::train`].
    fn predict(&self, features: &[FeatureVector]) -> Result<Vec<RiskTier>, PipelineError>;
}

type Forest = RandomForestClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;

enum TrainedModel {
    Forest(Box<Forest>),
    /// Every training label was the same tier; the forest refuses to fit a
    /// single class, and any classifier would answer this tier anyway.
    Constant(RiskTier),
}

/// Seeded random forest implementation of [`RiskClassifier`].
pub struct RandomForestRiskClassifier {
    config: ClassifierConfig,
    model: Option<TrainedModel>,
}

impl RandomForestRiskClassifier {
    /// Creates an untrained classifier.
    #[must_use]
    pub const fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            model: None,
        }
    }

    fn parameters(&self) -> RandomForestClassifierParameters {
        let mut params = RandomForestClassifierParameters::default()
            .with_n_trees(self.config.n_estimators)
            .with_seed(self.config.seed);
        if let Some(depth) = self.config.max_depth {
            params = params.with_max_depth(depth);
        }
        params
    }
}

impl Default for RandomForestRiskClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl RiskClassifier for RandomForestRiskClassifier {
    fn train(
        &mut self,
        features: &[FeatureVector],
        labels: &[RiskTier],
    ) -> Result<(), PipelineError> {
        validate_features(features)?;
        if features.len() != labels.len() {
            return Err(PipelineError::InvalidFeatures {
                message: format!(
                    "{} feature vectors but {} labels",
                    features.len(),
                    labels.len()
                ),
            });
        }

        let first = labels[0];
        if labels.iter().all(|label| *label == first) {
            log::debug!("All {} training labels are {first}", labels.len());
            self.model = Some(TrainedModel::Constant(first));
            return Ok(());
        }

        let x = to_matrix(features);
        let y: Vec<i32> = labels.iter().map(|l| i32::from(l.index())).collect();

        log::debug!(
            "Training random forest: {} samples, {} trees, seed {}",
            features.len(),
            self.config.n_estimators,
            self.config.seed
        );

        let forest = Forest::fit(&x, &y, self.parameters())
            .map_err(|e| PipelineError::Classifier(format!("Failed to train forest: {e}")))?;

        self.model = Some(TrainedModel::Forest(Box::new(forest)));
        Ok(())
    }

    fn predict(&self, features: &[FeatureVector]) -> Result<Vec<RiskTier>, PipelineError> {
        let model = self.model.as_ref().ok_or(PipelineError::ModelNotTrained)?;
        validate_features(features)?;

        match model {
            TrainedModel::Constant(tier) => Ok(vec![*tier; features.len()]),
            TrainedModel::Forest(forest) => forest
                .predict(&to_matrix(features))
                .map_err(|e| PipelineError::Classifier(format!("Failed to predict: {e}")))?
                .into_iter()
                .map(|label| {
                    RiskTier::from_index(i64::from(label))
                        .map_err(|e| PipelineError::Classifier(e.to_string()))
                })
                .collect(),
        }
    }
}

/// Checks that `features` is non-empty and every component is a finite
/// proportion in `[0, 1]`.
///
/// # Errors
///
/// Returns [`PipelineError::InsufficientData`] for empty input and
/// [`PipelineError::InvalidFeatures`] for out-of-range components.
pub fn validate_features(features: &[FeatureVector]) -> Result<(), PipelineError> {
    if features.is_empty() {
        return Err(PipelineError::InsufficientData {
            message: "no feature vectors".to_string(),
        });
    }

    for (row, vector) in features.iter().enumerate() {
        if let Some(value) = vector
            .iter()
            .find(|v| !v.is_finite() || **v < 0.0 || **v > 1.0)
        {
            return Err(PipelineError::InvalidFeatures {
                message: format!("row {row} has component {value} outside [0, 1]"),
            });
        }
    }

    Ok(())
}

fn to_matrix(features: &[FeatureVector]) -> DenseMatrix<f64> {
    let ncols = features[0].len();
    let data: Vec<f64> = features.iter().flat_map(|v| v.iter().copied()).collect();
    DenseMatrix::new(features.len(), ncols, data, false)
}
