pub mod classification;
pub mod error;
pub mod pattern;
pub mod report;

pub use classification::{
    AppType, AppTypeDetection, ClassificationResult, Detection, FallbackField,
    FrameworkDetection, InfrastructureProfile, Label, Requirement, Scored, blend_confidence,
};
pub use error::{Result, StackError, ValidationIssue, ValidationIssueKind};
pub use pattern::{ArchitecturePattern, ArchitecturePatternMatch, Support, Tier, UserPreferences};
pub use report::{ConfidenceLevel, ValidationReport};

// =============================================================================
// Domain Newtypes
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// Content-derived key under which a processed result is cached
///
/// Prevents accidental mixing of cache keys with other string types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw project description from which classification results were extracted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisInput {
    /// Free-text answers from the questionnaire
    pub description: String,
    pub file_names: Vec<String>,
    pub file_contents: Vec<String>,
}

impl AnalysisInput {
    pub fn from_description(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    /// Builder: add an uploaded file
    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.file_names.push(name.into());
        self.file_contents.push(content.into());
        self
    }
}
