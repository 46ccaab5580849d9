//! Validation report attached to a classification result during processing

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{ValidationIssue, ValidationIssueKind};
use crate::constants::tiers;

/// Confidence tier shown to users as a badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    /// Processing failed; the result is passed through untouched
    Error,
    Low,
    Fair,
    Good,
    Excellent,
}

impl ConfidenceLevel {
    /// Fixed threshold ladder over an overall confidence
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence < tiers::LOW {
            ConfidenceLevel::Low
        } else if confidence < tiers::FAIR {
            ConfidenceLevel::Fair
        } else if confidence < tiers::GOOD {
            ConfidenceLevel::Good
        } else {
            ConfidenceLevel::Excellent
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceLevel::Error => write!(f, "error"),
            ConfidenceLevel::Low => write!(f, "low"),
            ConfidenceLevel::Fair => write!(f, "fair"),
            ConfidenceLevel::Good => write!(f, "good"),
            ConfidenceLevel::Excellent => write!(f, "excellent"),
        }
    }
}

/// Outcome of validating one classification result.
///
/// Ephemeral: never cached or persisted past one processing call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub confidence_level: ConfidenceLevel,
    /// Hard failures (structural, range)
    pub issues: Vec<ValidationIssue>,
    /// Soft inconsistencies
    pub warnings: Vec<ValidationIssue>,
    /// Advisory hints for the user
    pub suggestions: Vec<String>,
}

impl ValidationReport {
    pub fn new(confidence_level: ConfidenceLevel) -> Self {
        Self {
            is_valid: true,
            confidence_level,
            issues: Vec::new(),
            warnings: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Report for a processing failure
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            confidence_level: ConfidenceLevel::Error,
            issues: vec![ValidationIssue::new(
                ValidationIssueKind::Processing,
                message,
            )],
            warnings: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Record an issue; fatal kinds invalidate the report, others become warnings
    pub fn add(&mut self, issue: ValidationIssue) {
        if issue.kind.is_fatal() {
            self.is_valid = false;
            self.issues.push(issue);
        } else {
            self.warnings.push(issue);
        }
    }

    pub fn suggest(&mut self, suggestion: impl Into<String>) {
        let suggestion = suggestion.into();
        if !self.suggestions.contains(&suggestion) {
            self.suggestions.push(suggestion);
        }
    }

    /// Whether any hard issue is an out-of-range or non-finite value
    pub fn has_range_issues(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.kind == ValidationIssueKind::Range)
    }

    /// Whether the fallback resolver should run on the associated result
    pub fn needs_fallback(&self) -> bool {
        !self.is_valid || self.confidence_level == ConfidenceLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_issues_distinguished_from_missing_fields() {
        let mut report = ValidationReport::new(ConfidenceLevel::Good);
        report.add(ValidationIssue::missing("confidence"));
        assert!(!report.is_valid);
        assert!(!report.has_range_issues());

        report.add(ValidationIssue::range(
            "framework.confidence",
            "1.5 is outside [0, 1]",
        ));
        assert!(report.has_range_issues());
    }

    #[test]
    fn test_tier_ladder() {
        assert_eq!(ConfidenceLevel::from_confidence(0.0), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_confidence(0.29), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_confidence(0.3), ConfidenceLevel::Fair);
        assert_eq!(ConfidenceLevel::from_confidence(0.59), ConfidenceLevel::Fair);
        assert_eq!(ConfidenceLevel::from_confidence(0.6), ConfidenceLevel::Good);
        assert_eq!(ConfidenceLevel::from_confidence(0.79), ConfidenceLevel::Good);
        assert_eq!(
            ConfidenceLevel::from_confidence(0.8),
            ConfidenceLevel::Excellent
        );
        assert_eq!(
            ConfidenceLevel::from_confidence(1.0),
            ConfidenceLevel::Excellent
        );
    }

    #[test]
    fn test_add_routes_by_kind() {
        let mut report = ValidationReport::new(ConfidenceLevel::Good);
        report.add(ValidationIssue::consistency("odd pairing"));
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 1);

        report.add(ValidationIssue::missing("timestamp"));
        assert!(!report.is_valid);
        assert_eq!(report.issues.len(), 1);
        assert!(report.needs_fallback());
    }

    #[test]
    fn test_suggest_deduplicates() {
        let mut report = ValidationReport::new(ConfidenceLevel::Fair);
        report.suggest("add a package.json");
        report.suggest("add a package.json");
        assert_eq!(report.suggestions.len(), 1);
    }

    #[test]
    fn test_error_report() {
        let report = ValidationReport::error("boom");
        assert!(!report.is_valid);
        assert_eq!(report.confidence_level, ConfidenceLevel::Error);
        assert_eq!(report.confidence_level.to_string(), "error");
    }
}
