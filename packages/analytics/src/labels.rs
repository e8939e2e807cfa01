//! Training label assignment.

use crime_risk_analytics_models::{AreaFeature, Thresholds};
use crime_risk_crime_models::RiskTier;

/// Maps an incident total to its tier.
///
/// Comparisons are strict: a total equal to a threshold falls into the
/// lower tier.
#[must_use]
pub const fn assign_tier(total_incidents: u64, thresholds: &Thresholds) -> RiskTier {
    if total_incidents > thresholds.q3 {
        RiskTier::VeryHigh
    } else if total_incidents > thresholds.q2 {
        RiskTier::High
    } else if total_incidents > thresholds.q1 {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

/// Labels every feature row by its total.
#[must_use]
pub fn assign_tiers(features: &[AreaFeature], thresholds: &Thresholds) -> Vec<RiskTier> {
    features
        .iter()
        .map(|f| assign_tier(f.total_incidents, thresholds))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: Thresholds = Thresholds {
        q1: 2,
        q2: 5,
        q3: 10,
    };

    #[test]
    fn equal_to_threshold_falls_lower() {
        assert_eq!(assign_tier(2, &T), RiskTier::Low);
        assert_eq!(assign_tier(5, &T), RiskTier::Medium);
        assert_eq!(assign_tier(10, &T), RiskTier::High);
    }

    #[test]
    fn above_threshold_moves_up() {
        assert_eq!(assign_tier(0, &T), RiskTier::Low);
        assert_eq!(assign_tier(3, &T), RiskTier::Medium);
        assert_eq!(assign_tier(6, &T), RiskTier::High);
        assert_eq!(assign_tier(11, &T), RiskTier::VeryHigh);
    }

    #[test]
    fn monotonic_in_total() {
        let mut previous = RiskTier::Low;
        for total in 0..50 {
            let tier = assign_tier(total, &T);
            assert!(tier >= previous, "{total} dropped from {previous} to {tier}");
            previous = tier;
        }
    }

    #[test]
    fn collapsed_thresholds() {
        let t = Thresholds { q1: 3, q2: 3, q3: 3 };
        assert_eq!(assign_tier(3, &t), RiskTier::Low);
        assert_eq!(assign_tier(4, &t), RiskTier::VeryHigh);
    }
}
