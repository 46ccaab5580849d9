//! Stackwise - Analysis Consensus Engine
//!
//! Turns several independent, partial classifications of a software project
//! (framework, application type, infrastructure needs) into one validated,
//! confidence-scored consensus, then ranks deployment architectures against it.
//!
//! ## Core Features
//!
//! - **Validation**: structural, range and consistency checks with tiered confidence
//! - **Consensus**: weighted voting across sources, OR-merged infrastructure
//! - **Fallbacks**: deterministic cross-inference of weak sub-fields
//! - **Caching**: bounded, time-expiring content-addressed result cache
//! - **Pattern Ranking**: weighted criteria scoring with preference-aware ranking
//!
//! ## Quick Start
//!
//! ```ignore
//! use stackwise::{AnalysisProcessor, AnalysisInput, UserPreferences};
//!
//! let processor = AnalysisProcessor::new();
//! let input = AnalysisInput::from_description("todo app with login");
//! let recommendation = processor.recommend(Some(&input), &results, &UserPreferences::default());
//! println!("{}", recommendation.analysis.result.summary());
//! ```
//!
//! ## Modules
//!
//! - [`analysis`]: validator, combiner, fallback resolver, cache, processor
//! - [`patterns`]: architecture catalog and scorer
//! - [`config`]: layered configuration
//! - [`types`]: data model and errors

pub mod analysis;
pub mod cli;
pub mod config;
pub mod constants;
pub mod patterns;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{Result, StackError};

// Data Model
pub use types::{
    AnalysisInput, AppType, ClassificationResult, ConfidenceLevel, UserPreferences,
    ValidationReport,
};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use analysis::{
    AnalysisProcessor, ClassificationValidator, ConsensusCombiner, FallbackResolver,
    ProcessedAnalysis, Recommendation, ResultCache,
};
pub use patterns::{PatternCatalog, PatternScorer};
