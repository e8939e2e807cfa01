#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Postal zone identifiers and the allow-list of zones the pipeline covers.
//!
//! Incident records carry their postal code as free text. [`AreaCode`]
//! coerces that text into an integer key, and [`ValidAreaSet`] decides which
//! keys take part in aggregation. The default set covers the Phoenix metro
//! zones (85001-85099 plus 85280-85289).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer postal zone identifier used as the aggregation key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AreaCode(pub u32);

impl AreaCode {
    /// Coerces a raw area-code string into an integer code.
    ///
    /// Surrounding whitespace is ignored and integral decimal forms such as
    /// `"85001.0"` are accepted. Returns `None` for empty, fractional,
    /// negative, or non-numeric input.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn coerce(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(code) = trimmed.parse::<u32>() {
            return Some(Self(code));
        }

        let value: f64 = trimmed.parse().ok()?;
        if value.is_finite()
            && value.fract() == 0.0
            && value >= 0.0
            && value <= f64::from(u32::MAX)
        {
            Some(Self(value as u32))
        } else {
            None
        }
    }

    /// Returns the numeric value of this code.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AreaCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An inclusive range of postal codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaRange {
    /// First code in the range.
    pub start: u32,
    /// Last code in the range (inclusive).
    pub end: u32,
}

impl AreaRange {
    /// Creates a new inclusive range.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Whether `code` falls inside this range.
    #[must_use]
    pub const fn contains(&self, code: AreaCode) -> bool {
        code.0 >= self.start && code.0 <= self.end
    }

    /// Whether `start <= end`.
    #[must_use]
    pub const fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }
}

/// Phoenix city zones followed by the Tempe block.
pub const PHOENIX_AREA_RANGES: &[AreaRange] =
    &[AreaRange::new(85001, 85099), AreaRange::new(85280, 85289)];

/// Immutable allow-list of postal codes.
///
/// Built once (from [`PHOENIX_AREA_RANGES`] or from configuration) and only
/// ever read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidAreaSet {
    ranges: Vec<AreaRange>,
}

impl ValidAreaSet {
    /// Creates a set from the given ranges.
    #[must_use]
    pub const fn new(ranges: Vec<AreaRange>) -> Self {
        Self { ranges }
    }

    /// The default Phoenix-area allow-list.
    #[must_use]
    pub fn phoenix() -> Self {
        Self::new(PHOENIX_AREA_RANGES.to_vec())
    }

    /// Whether `code` is a member of any range.
    #[must_use]
    pub fn contains(&self, code: AreaCode) -> bool {
        self.ranges.iter().any(|range| range.contains(code))
    }

    /// Coerces `raw` and checks membership. Non-numeric input is never a
    /// member.
    #[must_use]
    pub fn admit(&self, raw: &str) -> Option<AreaCode> {
        AreaCode::coerce(raw).filter(|code| self.contains(*code))
    }
}

impl Default for ValidAreaSet {
    fn default() -> Self {
        Self::phoenix()
    }
}

/// Number of incidents recorded in a single area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaCount {
    /// The area.
    pub area_code: AreaCode,
    /// Incidents whose area code matched, after filtering.
    pub total_incidents: u64,
}
