//! Architecture pattern matching
//!
//! - [`PatternCatalog`]: injected set of deployment topologies (built-in or file)
//! - [`PatternScorer`]: weighted scoring and preference-aware ranking

pub mod catalog;
pub mod scorer;

pub use catalog::PatternCatalog;
pub use scorer::{AppTypeCompatibility, PatternScore, PatternScorer};
