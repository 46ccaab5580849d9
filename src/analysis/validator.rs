//! Classification Validation
//!
//! Validates a classification result in three passes:
//! - Structural: required top-level fields present (hard failure)
//! - Range: confidences in [0, 1], complexity in [1, 5] (hard failure)
//! - Consistency: cross-field heuristics (advisory only)
//!
//! Consistency findings never invalidate a result: full-stack projects
//! legitimately produce combinations such as a frontend framework with an `api`
//! app type.

use super::framework::{FrameworkFamily, family_of};
use crate::constants::{complexity, fallback};
use crate::types::{
    AppType, ClassificationResult, ConfidenceLevel, Detection, InfrastructureProfile, Label,
    ValidationIssue, ValidationReport,
};

/// Validator for classification results
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassificationValidator;

impl ClassificationValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a classification result. Pure: never mutates its input.
    pub fn validate(&self, result: &ClassificationResult) -> ValidationReport {
        let overall = result
            .confidence
            .filter(|c| c.is_finite())
            .unwrap_or(0.0);
        let mut report = ValidationReport::new(ConfidenceLevel::from_confidence(overall));

        self.check_structure(result, &mut report);
        self.check_ranges(result, &mut report);
        self.check_consistency(result, &mut report);
        self.collect_suggestions(result, &mut report);

        report
    }

    // =========================================================================
    // Structural
    // =========================================================================

    fn check_structure(&self, result: &ClassificationResult, report: &mut ValidationReport) {
        if result.framework.is_none() {
            report.add(ValidationIssue::missing("framework"));
        }
        if result.app_type.is_none() {
            report.add(ValidationIssue::missing("appType"));
        }
        if result.infrastructure.is_none() {
            report.add(ValidationIssue::missing("infrastructure"));
        }
        if result.confidence.is_none() {
            report.add(ValidationIssue::missing("confidence"));
        }
        if result.timestamp.is_none() {
            report.add(ValidationIssue::missing("timestamp"));
        }

        if result.sources == 0 {
            report.add(ValidationIssue::range(
                "sources",
                "at least one source analysis is required",
            ));
        }

        if !result.fallbacks_applied.is_empty() && result.original_confidence.is_none() {
            report.add(ValidationIssue::missing("originalConfidence"));
        }
    }

    // =========================================================================
    // Range
    // =========================================================================

    fn check_ranges(&self, result: &ClassificationResult, report: &mut ValidationReport) {
        if let Some(confidence) = result.confidence {
            check_unit(report, "confidence", confidence);
        }
        if let Some(original) = result.original_confidence {
            check_unit(report, "originalConfidence", original);
        }
        if let Some(framework) = &result.framework {
            check_detection(report, "framework", framework);
        }
        if let Some(app_type) = &result.app_type {
            check_detection(report, "appType", app_type);
        }
        if let Some(infra) = &result.infrastructure {
            check_infrastructure(report, infra);
        }
    }

    // =========================================================================
    // Consistency (advisory)
    // =========================================================================

    fn check_consistency(&self, result: &ClassificationResult, report: &mut ValidationReport) {
        if let Some(framework) = &result.framework {
            if framework.id.trim().is_empty() {
                report.add(
                    ValidationIssue::consistency("framework id is empty").with_field("framework.id"),
                );
            }
            check_alternatives_order(report, "framework", framework);
        }
        if let Some(app_type) = &result.app_type {
            check_alternatives_order(report, "appType", app_type);
        }

        let app_type = result.app_type_id();
        if let Some(framework) = result.framework_id() {
            match (family_of(framework), app_type) {
                (FrameworkFamily::Frontend, AppType::Api) => {
                    report.add(ValidationIssue::consistency(format!(
                        "frontend framework '{}' detected for an api application",
                        framework
                    )));
                }
                (FrameworkFamily::Backend, AppType::Spa | AppType::Static) => {
                    report.add(ValidationIssue::consistency(format!(
                        "backend framework '{}' detected for a {} application",
                        framework, app_type
                    )));
                }
                _ => {}
            }
        }

        if app_type == AppType::Static
            && let Some(infra) = &result.infrastructure
        {
            if infra.requires("database") {
                report.add(ValidationIssue::consistency(
                    "static site marked as requiring a database",
                ));
            }
            if infra.complexity >= complexity::STATIC_WARNING {
                report.add(ValidationIssue::consistency(format!(
                    "static site with infrastructure complexity {}",
                    infra.complexity
                )));
            }
        }
    }

    // =========================================================================
    // Suggestions
    // =========================================================================

    fn collect_suggestions(&self, result: &ClassificationResult, report: &mut ValidationReport) {
        let threshold = fallback::CONFIDENT_THRESHOLD;

        if !result
            .framework
            .as_ref()
            .is_some_and(|f| f.is_confident(threshold))
        {
            report.suggest(
                "Upload a dependency manifest (package.json, requirements.txt, Gemfile) so the framework can be detected reliably",
            );
        }

        if !result
            .app_type
            .as_ref()
            .is_some_and(|a| a.is_confident(threshold))
        {
            report.suggest(
                "Describe how the application is served (single-page app, server-rendered, API, static site)",
            );
        }

        if result
            .infrastructure
            .as_ref()
            .is_none_or(|i| i.requirements.is_empty())
        {
            report.suggest(
                "Mention whether the project needs a database, authentication, realtime updates or file storage",
            );
        }

        if !result.fallbacks_applied.is_empty() {
            report.suggest("Some fields were inferred from defaults; review them before deploying");
        }

        if report.confidence_level == ConfidenceLevel::Low {
            report.suggest(
                "Provide more project files or a more detailed description to raise confidence",
            );
        }
    }
}

fn check_unit(report: &mut ValidationReport, field: &str, value: f64) {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        report.add(ValidationIssue::range(
            field,
            format!("confidence must be within [0, 1], got {}", value),
        ));
    }
}

fn check_detection<T: Label>(report: &mut ValidationReport, field: &str, detection: &Detection<T>) {
    check_unit(report, &format!("{}.confidence", field), detection.confidence);
    for (idx, alternative) in detection.alternatives.iter().enumerate() {
        check_unit(
            report,
            &format!("{}.alternatives[{}].confidence", field, idx),
            alternative.confidence,
        );
    }
}

fn check_infrastructure(report: &mut ValidationReport, infra: &InfrastructureProfile) {
    check_unit(report, "infrastructure.confidence", infra.confidence);
    for (name, requirement) in &infra.requirements {
        check_unit(
            report,
            &format!("infrastructure.requirements.{}.confidence", name),
            requirement.confidence,
        );
    }
    if !(complexity::MIN..=complexity::MAX).contains(&infra.complexity) {
        report.add(ValidationIssue::range(
            "infrastructure.complexity",
            format!(
                "complexity must be within [{}, {}], got {}",
                complexity::MIN,
                complexity::MAX,
                infra.complexity
            ),
        ));
    }
}

fn check_alternatives_order<T: Label>(
    report: &mut ValidationReport,
    field: &str,
    detection: &Detection<T>,
) {
    if detection.alternatives.iter().any(|a| a.id == detection.id) {
        report.add(
            ValidationIssue::consistency(format!(
                "alternatives repeat the chosen value '{}'",
                detection.id
            ))
            .with_field(format!("{}.alternatives", field)),
        );
    }

    let sorted = detection
        .alternatives
        .windows(2)
        .all(|pair| pair[0].confidence >= pair[1].confidence);
    if !sorted {
        report.add(
            ValidationIssue::consistency("alternatives are not sorted by confidence")
                .with_field(format!("{}.alternatives", field)),
        );
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AppTypeDetection, FallbackField, FrameworkDetection, Scored, ValidationIssueKind,
    };

    fn complete(framework: &str, fw_conf: f64, app_type: AppType, app_conf: f64) -> ClassificationResult {
        ClassificationResult::new(
            FrameworkDetection::new(framework, fw_conf),
            AppTypeDetection::new(app_type, app_conf),
            InfrastructureProfile::new(2, 0.8).with_requirement("database", true, 0.8),
        )
    }

    #[test]
    fn test_valid_result() {
        let report = ClassificationValidator::new().validate(&complete("react", 0.9, AppType::Spa, 0.9));
        assert!(report.is_valid);
        assert!(report.issues.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.confidence_level, ConfidenceLevel::Excellent);
    }

    #[test]
    fn test_missing_fields_are_hard_issues() {
        let report = ClassificationValidator::new().validate(&ClassificationResult::empty());
        assert!(!report.is_valid);
        let fields: Vec<_> = report
            .issues
            .iter()
            .filter_map(|i| i.field.as_deref())
            .collect();
        assert_eq!(
            fields,
            vec!["framework", "appType", "infrastructure", "confidence", "timestamp"]
        );
        assert!(
            report
                .issues
                .iter()
                .all(|i| i.kind == ValidationIssueKind::MissingField)
        );
        assert_eq!(report.confidence_level, ConfidenceLevel::Low);
    }

    #[test]
    fn test_out_of_range_confidence() {
        let mut result = complete("react", 0.9, AppType::Spa, 0.9);
        if let Some(framework) = result.framework.as_mut() {
            framework.confidence = 1.4;
        }
        let report = ClassificationValidator::new().validate(&result);
        assert!(!report.is_valid);
        assert_eq!(report.issues[0].kind, ValidationIssueKind::Range);
        assert_eq!(report.issues[0].field.as_deref(), Some("framework.confidence"));
    }

    #[test]
    fn test_nan_confidence_is_range_issue() {
        let mut result = complete("react", 0.9, AppType::Spa, 0.9);
        result.confidence = Some(f64::NAN);
        let report = ClassificationValidator::new().validate(&result);
        assert!(!report.is_valid);
        assert_eq!(report.confidence_level, ConfidenceLevel::Low);
    }

    #[test]
    fn test_complexity_out_of_range() {
        let mut result = complete("django", 0.9, AppType::Api, 0.9);
        if let Some(infra) = result.infrastructure.as_mut() {
            infra.complexity = 7;
        }
        let report = ClassificationValidator::new().validate(&result);
        assert!(!report.is_valid);
        assert_eq!(
            report.issues[0].field.as_deref(),
            Some("infrastructure.complexity")
        );
    }

    #[test]
    fn test_frontend_with_api_is_warning_only() {
        let report = ClassificationValidator::new().validate(&complete("react", 0.9, AppType::Api, 0.9));
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].message.contains("frontend framework"));
    }

    #[test]
    fn test_backend_with_spa_is_warning_only() {
        let report = ClassificationValidator::new().validate(&complete("flask", 0.9, AppType::Spa, 0.9));
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_static_with_database_warns() {
        let report =
            ClassificationValidator::new().validate(&complete("hugo", 0.9, AppType::Static, 0.9));
        assert!(report.is_valid);
        assert!(
            report
                .warnings
                .iter()
                .any(|w| w.message.contains("requiring a database"))
        );
    }

    #[test]
    fn test_unsorted_alternatives_warn() {
        let mut result = complete("react", 0.9, AppType::Spa, 0.9);
        if let Some(framework) = result.framework.as_mut() {
            framework.alternatives = vec![
                Scored::new("vue".to_string(), 0.1),
                Scored::new("svelte".to_string(), 0.4),
            ];
        }
        let report = ClassificationValidator::new().validate(&result);
        assert!(report.is_valid);
        assert_eq!(
            report.warnings[0].field.as_deref(),
            Some("framework.alternatives")
        );
    }

    #[test]
    fn test_fallback_without_original_confidence() {
        let mut result = complete("react", 0.9, AppType::Spa, 0.9);
        result.fallbacks_applied.insert(FallbackField::Framework);
        let report = ClassificationValidator::new().validate(&result);
        assert!(!report.is_valid);
        assert_eq!(
            report.issues[0].field.as_deref(),
            Some("originalConfidence")
        );
    }

    #[test]
    fn test_low_confidence_suggestions() {
        let result = complete("unknown", 0.1, AppType::Unknown, 0.1);
        let mut result = result;
        result.infrastructure = Some(InfrastructureProfile::default());
        result.confidence = Some(result.blended_confidence());
        let report = ClassificationValidator::new().validate(&result);
        assert!(report.is_valid);
        assert_eq!(report.confidence_level, ConfidenceLevel::Low);
        assert_eq!(report.suggestions.len(), 4);
        assert!(report.needs_fallback());
    }

    #[test]
    fn test_validate_is_pure() {
        let result = complete("react", 0.9, AppType::Api, 0.9);
        let before = result.clone();
        let _ = ClassificationValidator::new().validate(&result);
        assert_eq!(result, before);
    }
}
