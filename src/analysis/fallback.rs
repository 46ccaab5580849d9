//! Fallback Resolver - safe substitutes for low-confidence classifications
//!
//! Cross-infers weak sub-fields from confident siblings using fixed default
//! tables:
//!
//! | Confident      | Weak       | Substitute                                   |
//! |----------------|------------|----------------------------------------------|
//! | appType        | framework  | spa→react, api→nodejs, static→none, else react |
//! | framework      | appType    | frontend→spa, backend→api, else spa          |
//! | neither        | both       | framework first, then appType from it        |
//!
//! Infrastructure defaults derive from the (possibly just-defaulted) app type.
//! Inference is one hop only: a substituted value is never used to substitute
//! a sibling that was itself derived in the same call, except for the ordered
//! "neither" case above.

use std::collections::BTreeSet;
use tracing::{debug, warn};

use super::framework::{default_app_type_for, default_framework_for, family_of};
use crate::constants::{complexity, fallback};
use crate::types::{
    AppType, AppTypeDetection, ClassificationResult, Detection, FallbackField,
    FrameworkDetection, InfrastructureProfile, Label, Requirement, Scored, ValidationReport,
};

const NO_REQUIREMENTS: &[&str] = &[];
const API_REQUIREMENTS: &[&str] = &["database"];
const FULLSTACK_REQUIREMENTS: &[&str] = &["database", "auth"];

/// Minimal infrastructure implied by an app type: (required names, complexity floor)
fn infrastructure_defaults(app_type: AppType) -> (&'static [&'static str], i32) {
    match app_type {
        AppType::Api => (API_REQUIREMENTS, 2),
        AppType::Fullstack => (FULLSTACK_REQUIREMENTS, 3),
        _ => (NO_REQUIREMENTS, complexity::MIN),
    }
}

/// Derives safer substitute classifications
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackResolver;

impl FallbackResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a low-confidence or invalid result.
    ///
    /// Callers invoke this when `report.needs_fallback()`. Deterministic: the
    /// same input always yields the same output, and the input timestamp is
    /// carried over untouched.
    pub fn resolve(
        &self,
        result: &ClassificationResult,
        report: &ValidationReport,
    ) -> ClassificationResult {
        let original_confidence = sanitize_unit(result.overall_confidence());
        let mut resolved = if report.is_valid {
            result.clone()
        } else {
            debug!("Sanitizing result with {} issues", report.issues.len());
            sanitize(result)
        };
        let mut applied: BTreeSet<FallbackField> = resolved.fallbacks_applied.clone();

        self.resolve_labels(&mut resolved, &mut applied);
        if self.resolve_infrastructure(&mut resolved) {
            applied.insert(FallbackField::Infrastructure);
        }

        let penalty = fallback::PENALTY_PER_FIELD * applied.len() as f64;
        let confidence = (resolved.blended_confidence() - penalty)
            .max(fallback::CONFIDENCE_FLOOR)
            .min(1.0);

        if !applied.is_empty() {
            resolved.original_confidence =
                Some(resolved.original_confidence.unwrap_or(original_confidence));
            warn!(
                "Applied fallbacks {:?}: confidence {:.2} -> {:.2}",
                applied, original_confidence, confidence
            );
        }
        resolved.fallbacks_applied = applied;
        resolved.confidence = Some(confidence);

        debug!("Resolved: {}", resolved.summary());
        resolved
    }

    fn resolve_labels(
        &self,
        resolved: &mut ClassificationResult,
        applied: &mut BTreeSet<FallbackField>,
    ) {
        let threshold = fallback::CONFIDENT_THRESHOLD;
        let framework_confident = resolved
            .framework
            .as_ref()
            .is_some_and(|f| f.is_confident(threshold));
        let app_type_confident = resolved
            .app_type
            .as_ref()
            .is_some_and(|a| a.is_confident(threshold));

        match (framework_confident, app_type_confident) {
            (true, true) => {}
            (false, true) => {
                self.substitute_framework(resolved);
                applied.insert(FallbackField::Framework);
            }
            (true, false) => {
                self.substitute_app_type(resolved);
                applied.insert(FallbackField::AppType);
            }
            (false, false) => {
                // Order matters: the app type default is derived from the
                // framework default.
                self.substitute_framework(resolved);
                self.substitute_app_type(resolved);
                applied.insert(FallbackField::Framework);
                applied.insert(FallbackField::AppType);
            }
        }
    }

    fn substitute_framework(&self, resolved: &mut ClassificationResult) {
        let app_type = resolved.app_type_id();
        let framework = default_framework_for(app_type).to_string();
        let reason = if app_type.is_placeholder() {
            format!("no confident signal; defaulted to {}", framework)
        } else {
            format!("{} application implies {}", app_type, framework)
        };

        let replaced = demote(resolved.framework.take());
        resolved.framework = Some(
            FrameworkDetection::substitute(framework, fallback::SUBSTITUTE_CONFIDENCE, reason)
                .with_alternatives(replaced),
        );
    }

    fn substitute_app_type(&self, resolved: &mut ClassificationResult) {
        let framework = resolved
            .framework_id()
            .map(str::to_string)
            .unwrap_or_else(String::placeholder);
        let app_type = default_app_type_for(&framework);
        let reason = format!(
            "{} framework '{}' implies {}",
            family_of(&framework),
            framework,
            app_type
        );

        let replaced = demote(resolved.app_type.take());
        resolved.app_type = Some(
            AppTypeDetection::substitute(app_type, fallback::SUBSTITUTE_CONFIDENCE, reason)
                .with_alternatives(replaced),
        );
    }

    /// Returns true when the infrastructure was substituted wholesale
    fn resolve_infrastructure(&self, resolved: &mut ClassificationResult) -> bool {
        let app_type = resolved.app_type_id();
        let (defaults, complexity_floor) = infrastructure_defaults(app_type);

        match resolved.infrastructure.as_mut() {
            None => {
                let mut profile =
                    InfrastructureProfile::new(complexity_floor, fallback::SUBSTITUTE_CONFIDENCE);
                for name in defaults {
                    profile.requirements.insert(
                        name.to_string(),
                        Requirement::new(true, fallback::SUBSTITUTE_CONFIDENCE),
                    );
                }
                profile.fallback = true;
                profile.reason = Some(format!(
                    "minimal requirements for a {} application",
                    app_type
                ));
                resolved.infrastructure = Some(profile);
                true
            }
            Some(infra) if infra.confidence < fallback::CONFIDENT_THRESHOLD => {
                // Supplement only: detected entries are never overridden
                let mut added = Vec::new();
                for name in defaults {
                    if !infra.requirements.contains_key(*name) {
                        infra.requirements.insert(
                            name.to_string(),
                            Requirement::new(true, fallback::SUBSTITUTE_CONFIDENCE),
                        );
                        added.push(*name);
                    }
                }
                let raised = infra.complexity < complexity_floor;
                if raised {
                    infra.complexity = complexity_floor;
                }
                if !added.is_empty() || raised {
                    infra.fallback = true;
                    infra.reason = Some(format!(
                        "supplemented for a {} application (added: {})",
                        app_type,
                        if added.is_empty() {
                            "none".to_string()
                        } else {
                            added.join(", ")
                        }
                    ));
                }
                false
            }
            Some(_) => false,
        }
    }
}

/// Keep a replaced non-placeholder value as an alternative for audit
fn demote<T: Label>(detection: Option<Detection<T>>) -> Vec<Scored<T>> {
    detection
        .filter(|d| !d.id.is_placeholder())
        .map(|d| vec![Scored::new(d.id, d.confidence)])
        .unwrap_or_default()
}

fn sanitize_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn sanitize_detection<T: Label>(detection: &Detection<T>) -> Detection<T> {
    let alternatives = detection
        .alternatives
        .iter()
        .map(|a| Scored::new(a.id.clone(), sanitize_unit(a.confidence)))
        .collect();
    Detection {
        id: detection.id.clone(),
        confidence: sanitize_unit(detection.confidence),
        alternatives: Vec::new(),
        fallback: detection.fallback,
        reason: detection.reason.clone(),
    }
    .with_alternatives(alternatives)
}

/// Clamp every numeric field into its contractual range
fn sanitize(result: &ClassificationResult) -> ClassificationResult {
    let mut clean = result.clone();

    clean.framework = result.framework.as_ref().map(sanitize_detection);
    clean.app_type = result.app_type.as_ref().map(sanitize_detection);
    if let Some(infra) = clean.infrastructure.as_mut() {
        infra.confidence = sanitize_unit(infra.confidence);
        infra.complexity = infra.complexity.clamp(complexity::MIN, complexity::MAX);
        for requirement in infra.requirements.values_mut() {
            requirement.confidence = sanitize_unit(requirement.confidence);
        }
    }
    clean.original_confidence = result.original_confidence.map(sanitize_unit);
    clean.sources = result.sources.max(1);

    clean
}

// =============================================================================
// Tests
// =============================================================================
