//! Classification Result - the unit of exchange throughout the pipeline
//!
//! The record is a *schema* type: the five top-level fields are optional so that
//! incomplete input from a feature extractor can still be represented and
//! reported on. Semantic checks live in [`crate::analysis::validator`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::constants::{blend, complexity};

// =============================================================================
// Labels
// =============================================================================

/// A value that can be detected with a confidence (framework id, app type)
pub trait Label: Clone + PartialEq + fmt::Display {
    /// Placeholder values carry no signal and are ignored when tallying
    fn is_placeholder(&self) -> bool;

    /// The value used when nothing was detected
    fn placeholder() -> Self;
}

impl Label for String {
    fn is_placeholder(&self) -> bool {
        let trimmed = self.trim();
        trimmed.is_empty() || trimmed.eq_ignore_ascii_case("unknown")
    }

    fn placeholder() -> Self {
        "unknown".to_string()
    }
}

/// Application archetype
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum AppType {
    /// Single-page application
    Spa,
    /// Server-side rendered
    Ssr,
    /// Backend API
    Api,
    /// Frontend and backend in one project
    Fullstack,
    /// Static site
    Static,
    #[default]
    Unknown,
}

impl AppType {
    pub const ALL: [AppType; 6] = [
        AppType::Spa,
        AppType::Ssr,
        AppType::Api,
        AppType::Fullstack,
        AppType::Static,
        AppType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppType::Spa => "spa",
            AppType::Ssr => "ssr",
            AppType::Api => "api",
            AppType::Fullstack => "fullstack",
            AppType::Static => "static",
            AppType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spa" => Ok(AppType::Spa),
            "ssr" => Ok(AppType::Ssr),
            "api" => Ok(AppType::Api),
            "fullstack" => Ok(AppType::Fullstack),
            "static" => Ok(AppType::Static),
            "unknown" => Ok(AppType::Unknown),
            _ => Err(format!(
                "Unknown app type: {}. Valid values: spa, ssr, api, fullstack, static, unknown",
                s
            )),
        }
    }
}

impl Label for AppType {
    fn is_placeholder(&self) -> bool {
        *self == AppType::Unknown
    }

    fn placeholder() -> Self {
        AppType::Unknown
    }
}

// =============================================================================
// Detections
// =============================================================================

/// A candidate value with its confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scored<T> {
    pub id: T,
    pub confidence: f64,
}

impl<T> Scored<T> {
    pub fn new(id: T, confidence: f64) -> Self {
        Self { id, confidence }
    }
}

/// Detected value of one sub-field plus ranked alternatives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection<T> {
    pub id: T,
    pub confidence: f64,
    /// Sorted by descending confidence, never contains `id`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<Scored<T>>,
    /// Set when the fallback resolver produced or amended this value
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

pub type FrameworkDetection = Detection<String>;
pub type AppTypeDetection = Detection<AppType>;

impl<T: Label> Detection<T> {
    pub fn new(id: impl Into<T>, confidence: f64) -> Self {
        Self {
            id: id.into(),
            confidence,
            alternatives: Vec::new(),
            fallback: false,
            reason: None,
        }
    }

    /// Placeholder detection with zero confidence
    pub fn unknown() -> Self {
        Self::new(T::placeholder(), 0.0)
    }

    /// Substitute value produced by the fallback resolver
    pub fn substitute(id: T, confidence: f64, reason: impl Into<String>) -> Self {
        Self {
            id,
            confidence,
            alternatives: Vec::new(),
            fallback: true,
            reason: Some(reason.into()),
        }
    }

    /// Add alternatives; they are sorted and the chosen id is filtered out
    pub fn with_alternatives(mut self, alternatives: Vec<Scored<T>>) -> Self {
        let mut alternatives: Vec<Scored<T>> = alternatives
            .into_iter()
            .filter(|a| a.id != self.id)
            .collect();
        alternatives.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        self.alternatives = alternatives;
        self
    }

    /// Whether this detection carries real signal at the given threshold
    pub fn is_confident(&self, threshold: f64) -> bool {
        !self.id.is_placeholder() && self.confidence >= threshold
    }
}

// =============================================================================
// Infrastructure
// =============================================================================

/// One infrastructure requirement flag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub required: bool,
    pub confidence: f64,
}

impl Requirement {
    pub fn new(required: bool, confidence: f64) -> Self {
        Self {
            required,
            confidence,
        }
    }
}

fn default_complexity() -> i32 {
    complexity::MIN
}

/// Detected infrastructure needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfrastructureProfile {
    /// Requirement name (database, auth, realtime, storage, ...) to flag
    #[serde(default)]
    pub requirements: BTreeMap<String, Requirement>,
    /// Integer in 1..=5
    #[serde(default = "default_complexity")]
    pub complexity: i32,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Default for InfrastructureProfile {
    fn default() -> Self {
        Self {
            requirements: BTreeMap::new(),
            complexity: complexity::MIN,
            confidence: 0.0,
            fallback: false,
            reason: None,
        }
    }
}

impl InfrastructureProfile {
    pub fn new(complexity: i32, confidence: f64) -> Self {
        Self {
            complexity,
            confidence,
            ..Default::default()
        }
    }

    /// Builder: add a requirement flag
    pub fn with_requirement(
        mut self,
        name: impl Into<String>,
        required: bool,
        confidence: f64,
    ) -> Self {
        self.requirements
            .insert(name.into(), Requirement::new(required, confidence));
        self
    }

    /// Whether the named requirement is flagged as required
    pub fn requires(&self, name: &str) -> bool {
        self.requirements
            .get(name)
            .map(|r| r.required)
            .unwrap_or(false)
    }
}

// =============================================================================
// Classification Result
// =============================================================================

/// Sub-field names that the fallback resolver may override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FallbackField {
    Framework,
    AppType,
    Infrastructure,
}

impl fmt::Display for FallbackField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackField::Framework => write!(f, "framework"),
            FallbackField::AppType => write!(f, "appType"),
            FallbackField::Infrastructure => write!(f, "infrastructure"),
        }
    }
}

fn default_sources() -> usize {
    1
}

/// Merged framework / app type / infrastructure judgment for one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<FrameworkDetection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_type: Option<AppTypeDetection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infrastructure: Option<InfrastructureProfile>,
    /// Overall confidence, derived from the sub-fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Number of analyses merged into this result
    #[serde(default = "default_sources")]
    pub sources: usize,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub fallbacks_applied: BTreeSet<FallbackField>,
    /// Overall confidence before the fallback resolver ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_confidence: Option<f64>,
}

impl ClassificationResult {
    /// Build a complete single-source result; overall confidence is derived
    pub fn new(
        framework: FrameworkDetection,
        app_type: AppTypeDetection,
        infrastructure: InfrastructureProfile,
    ) -> Self {
        let confidence = blend_confidence(
            framework.confidence,
            app_type.confidence,
            infrastructure.confidence,
        );
        Self {
            framework: Some(framework),
            app_type: Some(app_type),
            infrastructure: Some(infrastructure),
            confidence: Some(confidence),
            timestamp: Some(Utc::now()),
            sources: 1,
            fallbacks_applied: BTreeSet::new(),
            original_confidence: None,
        }
    }

    /// Result with every optional field absent
    pub fn empty() -> Self {
        Self {
            framework: None,
            app_type: None,
            infrastructure: None,
            confidence: None,
            timestamp: None,
            sources: 1,
            fallbacks_applied: BTreeSet::new(),
            original_confidence: None,
        }
    }

    pub fn framework_id(&self) -> Option<&str> {
        self.framework.as_ref().map(|f| f.id.as_str())
    }

    pub fn app_type_id(&self) -> AppType {
        self.app_type
            .as_ref()
            .map(|a| a.id)
            .unwrap_or(AppType::Unknown)
    }

    /// Blended confidence computed from the present sub-fields
    pub fn blended_confidence(&self) -> f64 {
        blend_confidence(
            self.framework.as_ref().map(|f| f.confidence).unwrap_or(0.0),
            self.app_type.as_ref().map(|a| a.confidence).unwrap_or(0.0),
            self.infrastructure
                .as_ref()
                .map(|i| i.confidence)
                .unwrap_or(0.0),
        )
    }

    /// Overall confidence, falling back to the blend when absent
    pub fn overall_confidence(&self) -> f64 {
        self.confidence
            .unwrap_or_else(|| self.blended_confidence())
    }

    /// Get a summary string for logging
    pub fn summary(&self) -> String {
        format!(
            "Classification{{ framework: {}, appType: {}, confidence: {:.2}, sources: {}, fallbacks: {} }}",
            self.framework_id().unwrap_or("-"),
            self.app_type_id(),
            self.overall_confidence(),
            self.sources,
            self.fallbacks_applied.len()
        )
    }
}

/// Fixed-weight blend of sub-field confidences.
///
/// Only non-zero terms take part; their weights are re-normalised so a missing
/// sub-field does not drag the overall score towards zero.
pub fn blend_confidence(framework: f64, app_type: f64, infrastructure: f64) -> f64 {
    let terms = [
        (framework, blend::FRAMEWORK),
        (app_type, blend::APP_TYPE),
        (infrastructure, blend::INFRASTRUCTURE),
    ];

    let (weighted, weights) = terms
        .iter()
        .filter(|(value, _)| *value > 0.0)
        .fold((0.0, 0.0), |(sum, total), (value, weight)| {
            (sum + value * weight, total + weight)
        });

    if weights == 0.0 {
        0.0
    } else {
        (weighted / weights).clamp(0.0, 1.0)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_all_terms() {
        let c = blend_confidence(1.0, 0.5, 0.5);
        assert!((c - (0.4 + 0.15 + 0.15)).abs() < 1e-9);
    }

    #[test]
    fn test_blend_renormalises_over_present_terms() {
        // Only framework present: its confidence is the overall confidence
        assert!((blend_confidence(0.9, 0.0, 0.0) - 0.9).abs() < 1e-9);

        // Framework + app type: weights 0.4 / 0.3 re-normalised over 0.7
        let c = blend_confidence(0.8, 0.6, 0.0);
        assert!((c - (0.8 * 0.4 + 0.6 * 0.3) / 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_blend_all_zero() {
        assert_eq!(blend_confidence(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_label_placeholders() {
        assert!("unknown".to_string().is_placeholder());
        assert!("Unknown".to_string().is_placeholder());
        assert!("  ".to_string().is_placeholder());
        assert!(!"react".to_string().is_placeholder());
        assert!(!"none".to_string().is_placeholder());
        assert!(AppType::Unknown.is_placeholder());
        assert!(!AppType::Spa.is_placeholder());
    }

    #[test]
    fn test_with_alternatives_sorts_and_filters() {
        let detection = FrameworkDetection::new("react", 0.9).with_alternatives(vec![
            Scored::new("vue".to_string(), 0.2),
            Scored::new("react".to_string(), 0.8),
            Scored::new("svelte".to_string(), 0.5),
        ]);
        let ids: Vec<&str> = detection
            .alternatives
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["svelte", "vue"]);
    }

    #[test]
    fn test_app_type_from_str() {
        assert_eq!("SPA".parse::<AppType>().unwrap(), AppType::Spa);
        assert_eq!("fullstack".parse::<AppType>().unwrap(), AppType::Fullstack);
        assert!("desktop".parse::<AppType>().is_err());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "framework": {"id": "react", "confidence": 0.9},
            "appType": {"id": "spa", "confidence": 0.8},
            "infrastructure": {"requirements": {"database": {"required": false, "confidence": 0.7}}}
        }"#;
        let result: ClassificationResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.framework_id(), Some("react"));
        assert_eq!(result.app_type_id(), AppType::Spa);
        assert_eq!(result.sources, 1);
        assert!(result.confidence.is_none());
        assert!(result.timestamp.is_none());
        let infra = result.infrastructure.unwrap();
        assert_eq!(infra.complexity, 1);
        assert!(!infra.requires("database"));
    }

    #[test]
    fn test_serialize_fallback_fields() {
        let mut result = ClassificationResult::new(
            FrameworkDetection::substitute("nodejs".to_string(), 0.3, "api implies nodejs"),
            AppTypeDetection::new(AppType::Api, 0.6),
            InfrastructureProfile::default(),
        );
        result.fallbacks_applied.insert(FallbackField::Framework);
        result.original_confidence = Some(0.2);

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["framework"]["fallback"], true);
        assert_eq!(value["fallbacksApplied"][0], "framework");
        assert_eq!(value["originalConfidence"], 0.2);
        assert!(value["appType"].get("fallback").is_none());
    }

    #[test]
    fn test_new_derives_confidence() {
        let result = ClassificationResult::new(
            FrameworkDetection::new("react", 0.9),
            AppTypeDetection::new(AppType::Spa, 0.8),
            InfrastructureProfile::new(2, 0.7),
        );
        let expected = 0.4 * 0.9 + 0.3 * 0.8 + 0.3 * 0.7;
        assert!((result.confidence.unwrap() - expected).abs() < 1e-9);
        assert_eq!(result.sources, 1);
        assert!(result.timestamp.is_some());
    }
}
