//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/stackwise/) and project (.stackwise/) level configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{cache, patterns};
use crate::types::{StackError, Tier, UserPreferences};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Result cache settings
    pub cache: CacheConfig,

    /// Pattern catalog and ranking settings
    pub patterns: PatternsConfig,

    /// Default ranking priorities (CLI flags override)
    pub preferences: PreferencesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            cache: CacheConfig::default(),
            patterns: PatternsConfig::default(),
            preferences: PreferencesConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `StackError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        if self.cache.enabled && self.cache.capacity == 0 {
            return Err(StackError::Config(
                "cache.capacity must be greater than 0 (set cache.enabled = false instead)"
                    .to_string(),
            ));
        }

        if self.cache.ttl_secs == 0 {
            return Err(StackError::Config(
                "cache.ttl_secs must be greater than 0".to_string(),
            ));
        }

        if self.patterns.max_results == 0 {
            return Err(StackError::Config(
                "patterns.max_results must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Cache Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,

    /// Maximum cached results before the oldest is evicted
    pub capacity: usize,

    /// Time-to-live per entry in seconds
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: cache::DEFAULT_CAPACITY,
            ttl_secs: cache::DEFAULT_TTL_SECS,
        }
    }
}

// =============================================================================
// Pattern Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternsConfig {
    /// Custom catalog file (YAML, JSON or TOML); built-in catalog when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,

    /// Number of ranked matches to return
    pub max_results: usize,
}

impl Default for PatternsConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            max_results: patterns::DEFAULT_MAX_RESULTS,
        }
    }
}

// =============================================================================
// Preference Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesConfig {
    pub prioritize_cost: bool,
    pub prioritize_simplicity: bool,
    pub prioritize_scalability: bool,

    /// Expected traffic level (low, medium, high)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traffic: Option<Tier>,
}

impl PreferencesConfig {
    pub fn to_preferences(&self) -> UserPreferences {
        UserPreferences {
            prioritize_cost: self.prioritize_cost,
            prioritize_simplicity: self.prioritize_simplicity,
            prioritize_scalability: self.prioritize_scalability,
            expected_traffic: self.traffic,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
