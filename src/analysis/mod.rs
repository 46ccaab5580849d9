//! Analysis consensus pipeline
//!
//! ## Pipeline Stages
//!
//! 1. **Validate**: structural, range and consistency checks per source
//! 2. **Combine**: weighted vote across sources into one consensus
//! 3. **Fallback**: substitute safe defaults for weak sub-fields
//! 4. **Cache**: remember validated consensus per input
//!
//! [`AnalysisProcessor`] runs the stages in order; each stage is also usable
//! on its own.

pub mod cache;
pub mod combiner;
pub mod fallback;
pub mod framework;
pub mod processor;
pub mod validator;

pub use cache::{CacheStats, ResultCache};
pub use combiner::ConsensusCombiner;
pub use fallback::FallbackResolver;
pub use framework::{FrameworkFamily, family_of};
pub use processor::{AnalysisProcessor, ProcessedAnalysis, Recommendation};
pub use validator::ClassificationValidator;
