//! Global Constants
//!
//! Centralized constants for scoring and tuning.
//! All magic numbers should be defined here with documentation.
//!
//! Confidence tiers, blend weights and penalties are deliberately not part of
//! [`crate::config::Config`]: they define what a score *means*, so two runs with
//! different config files still produce comparable confidence values.

/// Confidence tier thresholds (upper bounds, exclusive)
pub mod tiers {
    /// Below this overall confidence a result is `low`
    pub const LOW: f64 = 0.3;

    /// Below this overall confidence a result is `fair`
    pub const FAIR: f64 = 0.6;

    /// Below this overall confidence a result is `good`; otherwise `excellent`
    pub const GOOD: f64 = 0.8;
}

/// Overall confidence blend weights
pub mod blend {
    pub const FRAMEWORK: f64 = 0.4;
    pub const APP_TYPE: f64 = 0.3;
    pub const INFRASTRUCTURE: f64 = 0.3;
}

/// Combiner support-score weights (frequency, mean confidence)
pub mod support {
    /// Framework: frequency weight
    pub const FRAMEWORK_FREQUENCY: f64 = 0.5;
    /// Framework: mean confidence weight
    pub const FRAMEWORK_CONFIDENCE: f64 = 0.5;

    /// App type carries more signal from file structure, so frequency counts more
    pub const APP_TYPE_FREQUENCY: f64 = 0.6;
    /// App type: mean confidence weight
    pub const APP_TYPE_CONFIDENCE: f64 = 0.4;
}

/// Infrastructure complexity bounds
pub mod complexity {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 5;

    /// Complexity that makes a static site suspicious
    pub const STATIC_WARNING: i32 = 4;
}

/// Fallback resolver constants
pub mod fallback {
    /// A sub-field at or above this confidence is trusted for cross-inference
    pub const CONFIDENT_THRESHOLD: f64 = 0.5;

    /// Confidence assigned to a substituted sub-field
    pub const SUBSTITUTE_CONFIDENCE: f64 = 0.3;

    /// Penalty subtracted from the blended confidence per substituted field
    pub const PENALTY_PER_FIELD: f64 = 0.1;

    /// A fallback result is never less confident than this
    pub const CONFIDENCE_FLOOR: f64 = 0.1;
}

/// Pattern scorer constants
pub mod scoring {
    /// Criterion weights (sum to 1.0)
    pub const APP_TYPE_WEIGHT: f64 = 0.35;
    pub const FRAMEWORK_WEIGHT: f64 = 0.25;
    pub const REQUIREMENTS_WEIGHT: f64 = 0.40;

    /// Requirement checklist weights (sum to 1.0)
    pub mod requirements {
        pub const DATABASE: f64 = 0.30;
        pub const AUTH: f64 = 0.20;
        pub const REALTIME: f64 = 0.20;
        pub const STORAGE: f64 = 0.15;
        pub const TRAFFIC: f64 = 0.15;
    }

    /// App type scores
    pub const APP_TYPE_EXACT: f64 = 1.0;
    pub const APP_TYPE_COMPATIBLE: f64 = 0.7;
    pub const APP_TYPE_MISMATCH: f64 = 0.2;

    /// Framework scores
    pub const FRAMEWORK_EXACT: f64 = 1.0;
    pub const FRAMEWORK_AGNOSTIC: f64 = 0.8;
    pub const FRAMEWORK_SAME_FAMILY: f64 = 0.6;
    pub const FRAMEWORK_MISMATCH: f64 = 0.3;

    /// Matches scoring below this are dropped before ranking
    pub const SCORE_FLOOR: f64 = 0.2;

    /// Ranking blend of raw match score and preference suitability
    pub const MATCH_WEIGHT: f64 = 0.7;
    pub const SUITABILITY_WEIGHT: f64 = 0.3;

    /// Suitability when the caller sets no priorities
    pub const NEUTRAL_SUITABILITY: f64 = 0.5;
}

/// Result cache constants
pub mod cache {
    /// Default maximum number of cached results
    pub const DEFAULT_CAPACITY: usize = 100;

    /// Default time-to-live for a cached result (30 minutes)
    pub const DEFAULT_TTL_SECS: u64 = 30 * 60;
}

/// Pattern ranking output constants
pub mod patterns {
    /// Default number of ranked matches returned to callers
    pub const DEFAULT_MAX_RESULTS: usize = 5;
}
