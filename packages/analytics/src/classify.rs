//! Crime class mapping.
//!
//! Folds free-text incident categories into the three coarse
//! [`CrimeClass`]es using case-insensitive keyword detection.

use crime_risk_crime_models::{ClassifiedIncident, CrimeClass, RawIncident};

use crate::PipelineError;

const ASSAULT_KEYWORDS: &[&str] = &["AGGRAVATED ASSAULT", "RAPE", "MURDER"];

const THEFT_KEYWORDS: &[&str] = &["BURGLARY", "LARCENY", "MOTOR VEHICLE", "ROBBERY"];

/// Maps a raw category label to its [`CrimeClass`].
///
/// Assault keywords are checked before theft keywords; anything else is
/// [`CrimeClass::Other`].
#[must_use]
pub fn classify_category(raw: &str) -> CrimeClass {
    let upper = raw.to_uppercase();

    if contains_any(&upper, ASSAULT_KEYWORDS) {
        return CrimeClass::Assault;
    }
    if contains_any(&upper, THEFT_KEYWORDS) {
        return CrimeClass::Theft;
    }

    CrimeClass::Other
}

/// Classifies a single record.
///
/// `row` is only used for error reporting.
///
/// # Errors
///
/// Returns [`PipelineError::MalformedRecord`] if the category is absent.
pub fn classify(row: usize, record: RawIncident) -> Result<ClassifiedIncident, PipelineError> {
    let category = record
        .category
        .ok_or_else(|| PipelineError::MalformedRecord {
            row,
            message: "missing crime category".to_string(),
        })?;

    let crime_class = classify_category(&category);

    Ok(ClassifiedIncident {
        area_code: record.area_code,
        category,
        crime_class,
    })
}

/// Classifies every record, failing on the first malformed one.
///
/// # Errors
///
/// Returns [`PipelineError::MalformedRecord`] for the first record without a
/// category.
pub fn classify_all(records: Vec<RawIncident>) -> Result<Vec<ClassifiedIncident>, PipelineError> {
    records
        .into_iter()
        .enumerate()
        .map(|(row, record)| classify(row, record))
        .collect()
}

/// Checks if `haystack` contains any of the given `needles`.
fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_assault_keywords() {
        assert_eq!(
            classify_category("MURDER AND NON-NEGLIGENT MANSLAUGHTER"),
            CrimeClass::Assault
        );
        assert_eq!(classify_category("AGGRAVATED ASSAULT"), CrimeClass::Assault);
        assert_eq!(classify_category("RAPE"), CrimeClass::Assault);
    }

    #[test]
    fn maps_theft_keywords() {
        assert_eq!(classify_category("BURGLARY"), CrimeClass::Theft);
        assert_eq!(classify_category("LARCENY-THEFT"), CrimeClass::Theft);
        assert_eq!(classify_category("MOTOR VEHICLE THEFT"), CrimeClass::Theft);
        assert_eq!(classify_category("ROBBERY"), CrimeClass::Theft);
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        assert_eq!(classify_category("larceny (attempted)"), CrimeClass::Theft);
        assert_eq!(classify_category("Aggravated Assault"), CrimeClass::Assault);
    }

    #[test]
    fn assault_wins_over_theft() {
        assert_eq!(classify_category("ROBBERY / MURDER"), CrimeClass::Assault);
    }

    #[test]
    fn unmatched_is_other() {
        assert_eq!(classify_category("ARSON"), CrimeClass::Other);
        assert_eq!(classify_category("DRUG OFFENSE"), CrimeClass::Other);
        assert_eq!(classify_category(""), CrimeClass::Other);
        // Simple assault is deliberately not an assault keyword.
        assert_eq!(classify_category("SIMPLE ASSAULT"), CrimeClass::Other);
    }

    #[test]
    fn classification_is_idempotent() {
        for label in ["MURDER", "larceny", "ARSON", "motor vehicle theft"] {
            let first = classify(0, RawIncident::new("85001", label)).unwrap();
            let second = classify_category(&first.category);
            assert_eq!(first.crime_class, second);
        }
    }

    #[test]
    fn missing_category_is_malformed() {
        let record = RawIncident {
            area_code: Some("85001".to_string()),
            category: None,
        };
        let err = classify_all(vec![RawIncident::new("85001", "RAPE"), record]).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedRecord { row: 1, .. }));
    }
}
