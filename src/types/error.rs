//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Two kinds of failure
//!
//! - **StackError**: something went wrong while *processing* (bad file, empty
//!   input, NaN confidence). The processor converts these into degraded output
//!   instead of propagating them to callers.
//! - **ValidationIssue**: a finding about a classification result. Issues never
//!   abort processing; they are collected into a [`super::ValidationReport`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Validation Issue
// =============================================================================

/// Validation issue kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationIssueKind {
    /// Required field missing (structural, hard failure)
    MissingField,
    /// Value out of range (hard failure)
    Range,
    /// Cross-field heuristic mismatch (advisory)
    Consistency,
    /// Unexpected failure while combining or resolving
    Processing,
}

impl fmt::Display for ValidationIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField => write!(f, "MISSING_FIELD"),
            Self::Range => write!(f, "RANGE"),
            Self::Consistency => write!(f, "CONSISTENCY"),
            Self::Processing => write!(f, "PROCESSING"),
        }
    }
}

impl ValidationIssueKind {
    /// Whether an issue of this kind invalidates the result
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingField | Self::Range | Self::Processing)
    }
}

/// Structured validation finding with field context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// What validation failed
    pub kind: ValidationIssueKind,
    /// Field path that failed validation (e.g. `framework.confidence`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Detailed message
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "[{}] {}: {}", self.kind, field, self.message)
        } else {
            write!(f, "[{}] {}", self.kind, self.message)
        }
    }
}

impl ValidationIssue {
    pub fn new(kind: ValidationIssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: None,
            message: message.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            kind: ValidationIssueKind::MissingField,
            message: format!("required field '{}' is missing", field),
            field: Some(field),
        }
    }

    pub fn range(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ValidationIssueKind::Range, message).with_field(field)
    }

    pub fn consistency(message: impl Into<String>) -> Self {
        Self::new(ValidationIssueKind::Consistency, message)
    }

    /// Add field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum StackError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    // -------------------------------------------------------------------------
    // Processing Errors
    // -------------------------------------------------------------------------
    #[error("No classification results to process")]
    EmptyInput,

    #[error("Non-finite value in '{field}'")]
    NonFinite { field: String },

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Invalid input in {}: {message}", path.display())]
    Input { path: PathBuf, message: String },

    #[error("Pattern catalog error: {0}")]
    Catalog(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StackError>;

impl StackError {
    /// Create an input error for a file
    pub fn input(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Input {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a non-finite value error
    pub fn non_finite(field: impl Into<String>) -> Self {
        Self::NonFinite {
            field: field.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
