#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-area crime risk pipeline.
//!
//! Raw incidents are classified into coarse crime classes, counted per valid
//! postal zone, turned into normalized class proportions, and labelled with
//! quartile-based risk tiers. A seeded random forest is trained on those
//! labels and then asked to predict a tier for every area.
//!
//! Every stage is a pure function over in-memory data. [`pipeline::run`]
//! sequences them and aborts on the first error.

pub mod aggregate;
pub mod classifier;
pub mod classify;
pub mod config;
pub mod features;
pub mod labels;
pub mod pipeline;
pub mod thresholds;

use crime_risk_geography_models::AreaCode;
use thiserror::Error;

pub use pipeline::{run, run_with};

/// Errors that can occur while running the risk pipeline.
///
/// All variants are terminal for the run in progress.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A record is missing its category or area field.
    #[error("Malformed record at row {row}: {message}")]
    MalformedRecord {
        /// Zero-based index of the offending record.
        row: usize,
        /// Description of what went wrong.
        message: String,
    },

    /// An area with zero incidents reached normalization.
    #[error("Cannot normalize area {area_code}: total incidents is zero")]
    DivisionByZero {
        /// The offending area.
        area_code: AreaCode,
    },

    /// Class counts for an area are missing or disagree with its total.
    #[error("Incomplete features for area {area_code}: {message}")]
    IncompleteFeature {
        /// The offending area.
        area_code: AreaCode,
        /// Description of what went wrong.
        message: String,
    },

    /// No areas were available to derive thresholds or train on.
    #[error("Insufficient data: {message}")]
    InsufficientData {
        /// Description of what went wrong.
        message: String,
    },

    /// Feature vectors or labels failed numeric validation.
    #[error("Invalid features: {message}")]
    InvalidFeatures {
        /// Description of what went wrong.
        message: String,
    },

    /// `predict` was called before `train`.
    #[error("Model has not been trained")]
    ModelNotTrained,

    /// The underlying classifier failed.
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// Pipeline configuration is invalid or unreadable.
    #[error("Config error: {0}")]
    Config(String),
}
