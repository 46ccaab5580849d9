//! Architecture pattern records and scoring output

use serde::{Deserialize, Serialize};
use std::fmt;

use super::classification::AppType;

/// How a pattern provides one infrastructure capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Support {
    /// Part of the topology
    Included,
    /// Can be added without changing the topology
    #[default]
    Optional,
    /// Not available in this topology
    Excluded,
}

/// Three-step scale used for traffic capacity and cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Low,
    Medium,
    High,
}

impl Tier {
    pub fn rank(&self) -> u8 {
        match self {
            Tier::Low => 0,
            Tier::Medium => 1,
            Tier::High => 2,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Low => write!(f, "low"),
            Tier::Medium => write!(f, "medium"),
            Tier::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Tier::Low),
            "medium" => Ok(Tier::Medium),
            "high" => Ok(Tier::High),
            _ => Err(format!(
                "Unknown level: {}. Valid values: low, medium, high",
                s
            )),
        }
    }
}

fn default_complexity() -> u8 {
    3
}

/// A catalogued deployment architecture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchitecturePattern {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// App types this pattern is built for
    pub app_types: Vec<AppType>,
    /// Frameworks this pattern is built for; empty means framework-agnostic
    #[serde(default)]
    pub frameworks: Vec<String>,
    #[serde(default)]
    pub database: Support,
    #[serde(default)]
    pub auth: Support,
    #[serde(default)]
    pub realtime: Support,
    #[serde(default)]
    pub storage: Support,
    /// Traffic the topology handles comfortably
    #[serde(default)]
    pub traffic: Tier,
    #[serde(default)]
    pub cost: Tier,
    /// Operational complexity, 1..=5
    #[serde(default = "default_complexity")]
    pub complexity: u8,
}

/// Caller priorities that shape the suitability score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct UserPreferences {
    pub prioritize_cost: bool,
    pub prioritize_simplicity: bool,
    pub prioritize_scalability: bool,
    /// Overrides the traffic estimate derived from the classification
    pub expected_traffic: Option<Tier>,
}

impl UserPreferences {
    pub fn has_priorities(&self) -> bool {
        self.prioritize_cost || self.prioritize_simplicity || self.prioritize_scalability
    }
}

/// Fit of one pattern against one classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchitecturePatternMatch {
    pub pattern_id: String,
    /// Weighted criteria score, 0..=1
    pub score: f64,
    /// Score tempered by the classification's own confidence, 0..=1
    pub confidence: f64,
    pub reasons: Vec<String>,
    pub warnings: Vec<String>,
    /// Preference fit, 0..=1
    pub suitability: f64,
    /// Final ranking key: 70% score, 30% suitability
    pub rank: f64,
}
