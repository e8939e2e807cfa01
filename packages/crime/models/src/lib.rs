#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Crime class and risk tier definitions.
//!
//! This crate defines the coarse crime classes that raw incident categories
//! are folded into, the ordinal risk tiers predicted per area, and the raw
//! and classified incident records that flow into the pipeline.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Coarse crime class assigned to every incident.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CrimeClass {
    /// Aggravated assault, rape, murder
    Assault,
    /// Burglary, larceny, motor vehicle theft, robbery
    Theft,
    /// Everything else
    Other,
}

/// Ordinal risk tier for an area, from lowest to highest.
///
/// The discriminant is the integer label used when training and querying the
/// classifier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    /// At or below the first quartile of area totals
    Low = 0,
    /// Above the first quartile
    Medium = 1,
    /// Above the median
    High = 2,
    /// Above the third quartile
    VeryHigh = 3,
}

impl RiskTier {
    /// Returns the integer class label for this tier.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Creates a tier from its integer class label.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 0-3.
    pub const fn from_index(value: i64) -> Result<Self, InvalidTierError> {
        match value {
            0 => Ok(Self::Low),
            1 => Ok(Self::Medium),
            2 => Ok(Self::High),
            3 => Ok(Self::VeryHigh),
            _ => Err(InvalidTierError { value }),
        }
    }

    /// Returns all variants of this enum in ascending order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High, Self::VeryHigh]
    }
}

/// Error returned when attempting to create a [`RiskTier`] from an invalid
/// class label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTierError {
    /// The invalid label that was provided.
    pub value: i64,
}

impl std::fmt::Display for InvalidTierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid risk tier label {}: expected 0-3", self.value)
    }
}

impl std::error::Error for InvalidTierError {}

/// A single incident row as read from the source data.
///
/// Both fields are optional so that an absent column or cell survives
/// ingestion and can be rejected by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIncident {
    /// Postal zone identifier exactly as it appeared in the source.
    pub area_code: Option<String>,
    /// Free-text incident category (e.g. `"LARCENY-THEFT"`).
    pub category: Option<String>,
}

impl RawIncident {
    /// Creates a record with both fields present.
    #[must_use]
    pub fn new(area_code: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            area_code: Some(area_code.into()),
            category: Some(category.into()),
        }
    }
}

/// A [`RawIncident`] with its [`CrimeClass`] attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedIncident {
    /// Postal zone identifier exactly as it appeared in the source.
    pub area_code: Option<String>,
    /// Free-text incident category.
    pub category: String,
    /// Class derived from the category.
    pub crime_class: CrimeClass,
}
