//! Pattern Scorer
//!
//! Scores each catalogued architecture against a classification on three
//! weighted criteria, then ranks the survivors by blending the raw score with
//! how well the pattern suits the caller's priorities.
//!
//! ```text
//! score = 0.35 × appType + 0.25 × framework + 0.40 × requirements
//! rank  = 0.70 × score   + 0.30 × suitability
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::PatternCatalog;
use crate::analysis::framework::{FrameworkFamily, family_of};
use crate::constants::{complexity, patterns::DEFAULT_MAX_RESULTS, scoring};
use crate::types::{
    AppType, ArchitecturePattern, ArchitecturePatternMatch, ClassificationResult, Label, Support,
    Tier, UserPreferences,
};

// =============================================================================
// App Type Compatibility
// =============================================================================

/// Symmetric table of app types that can share a deployment topology
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppTypeCompatibility {
    pairs: Vec<(AppType, AppType)>,
}

impl Default for AppTypeCompatibility {
    fn default() -> Self {
        Self::new(vec![
            (AppType::Spa, AppType::Static),
            (AppType::Spa, AppType::Ssr),
            (AppType::Ssr, AppType::Fullstack),
            (AppType::Api, AppType::Fullstack),
        ])
    }
}

impl AppTypeCompatibility {
    pub fn new(pairs: Vec<(AppType, AppType)>) -> Self {
        Self { pairs }
    }

    pub fn compatible(&self, a: AppType, b: AppType) -> bool {
        self.pairs
            .iter()
            .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    }
}

// =============================================================================
// Scoring
// =============================================================================

/// Raw criteria score for one pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternScore {
    pub score: f64,
    pub reasons: Vec<String>,
    pub warnings: Vec<String>,
}

impl PatternScore {
    fn new() -> Self {
        Self {
            score: 0.0,
            reasons: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Ranks catalogued architecture patterns against a classification
#[derive(Debug, Clone)]
pub struct PatternScorer {
    catalog: PatternCatalog,
    compatibility: AppTypeCompatibility,
    max_results: usize,
}

impl Default for PatternScorer {
    fn default() -> Self {
        Self::new(PatternCatalog::builtin(), AppTypeCompatibility::default())
    }
}

impl PatternScorer {
    pub fn new(catalog: PatternCatalog, compatibility: AppTypeCompatibility) -> Self {
        Self {
            catalog,
            compatibility,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Builder: cap the number of ranked matches
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Score one pattern with no caller preferences
    pub fn score(
        &self,
        pattern: &ArchitecturePattern,
        classification: &ClassificationResult,
    ) -> PatternScore {
        self.score_with(pattern, classification, &UserPreferences::default())
    }

    /// Score one pattern; preferences only affect the expected traffic estimate
    pub fn score_with(
        &self,
        pattern: &ArchitecturePattern,
        classification: &ClassificationResult,
        preferences: &UserPreferences,
    ) -> PatternScore {
        let mut out = PatternScore::new();

        let app_type = self.app_type_score(pattern, classification, &mut out);
        let framework = framework_score(pattern, classification, &mut out);
        let requirements = requirements_score(pattern, classification, preferences, &mut out);

        out.score = (scoring::APP_TYPE_WEIGHT * app_type
            + scoring::FRAMEWORK_WEIGHT * framework
            + scoring::REQUIREMENTS_WEIGHT * requirements)
            .clamp(0.0, 1.0);
        out
    }

    /// Score every catalogued pattern and return the ranked survivors
    pub fn match_patterns(
        &self,
        classification: &ClassificationResult,
        preferences: &UserPreferences,
    ) -> Vec<ArchitecturePatternMatch> {
        let overall = classification.overall_confidence();
        let overall = if overall.is_finite() {
            overall.clamp(0.0, 1.0)
        } else {
            0.0
        };

        let mut matches: Vec<ArchitecturePatternMatch> = self
            .catalog
            .patterns()
            .iter()
            .filter_map(|pattern| {
                let scored = self.score_with(pattern, classification, preferences);
                if scored.score < scoring::SCORE_FLOOR {
                    debug!("Dropping pattern {} (score {:.2})", pattern.id, scored.score);
                    return None;
                }

                let suitability = suitability(pattern, preferences);
                Some(ArchitecturePatternMatch {
                    pattern_id: pattern.id.clone(),
                    score: scored.score,
                    confidence: (scored.score + overall) / 2.0,
                    reasons: scored.reasons,
                    warnings: scored.warnings,
                    suitability,
                    rank: scoring::MATCH_WEIGHT * scored.score
                        + scoring::SUITABILITY_WEIGHT * suitability,
                })
            })
            .collect();

        // Stable: equal ranks keep catalog order
        matches.sort_by(|a, b| b.rank.total_cmp(&a.rank));
        matches.truncate(self.max_results);

        debug!(
            "Ranked {} of {} patterns",
            matches.len(),
            self.catalog.len()
        );
        matches
    }

    fn app_type_score(
        &self,
        pattern: &ArchitecturePattern,
        classification: &ClassificationResult,
        out: &mut PatternScore,
    ) -> f64 {
        let app_type = classification.app_type_id();

        if pattern.app_types.contains(&app_type) {
            out.reasons
                .push(format!("Built for {} applications", app_type));
            scoring::APP_TYPE_EXACT
        } else if pattern
            .app_types
            .iter()
            .any(|&t| self.compatibility.compatible(app_type, t))
        {
            out.reasons
                .push(format!("Compatible with {} applications", app_type));
            scoring::APP_TYPE_COMPATIBLE
        } else {
            out.warnings
                .push(format!("Not designed for {} applications", app_type));
            scoring::APP_TYPE_MISMATCH
        }
    }
}

fn framework_score(
    pattern: &ArchitecturePattern,
    classification: &ClassificationResult,
    out: &mut PatternScore,
) -> f64 {
    if pattern.frameworks.is_empty() {
        out.reasons.push("Framework-agnostic".to_string());
        return scoring::FRAMEWORK_AGNOSTIC;
    }

    let Some(framework) = classification
        .framework
        .as_ref()
        .map(|f| &f.id)
        .filter(|id| !id.is_placeholder())
    else {
        out.warnings
            .push("Framework unknown; pattern targets specific frameworks".to_string());
        return scoring::FRAMEWORK_MISMATCH;
    };

    if pattern
        .frameworks
        .iter()
        .any(|f| f.eq_ignore_ascii_case(framework))
    {
        out.reasons.push(format!("Supports {}", framework));
        return scoring::FRAMEWORK_EXACT;
    }

    let family = family_of(framework);
    let same_family = !matches!(family, FrameworkFamily::Unknown)
        && pattern.frameworks.iter().any(|f| family_of(f) == family);
    if same_family {
        out.reasons
            .push(format!("Supports {} frameworks like {}", family, framework));
        scoring::FRAMEWORK_SAME_FAMILY
    } else {
        out.warnings
            .push(format!("{} is not among the supported frameworks", framework));
        scoring::FRAMEWORK_MISMATCH
    }
}

/// Decision table for one capability
fn support_score(needed: bool, support: Support) -> f64 {
    match (needed, support) {
        (true, Support::Included) => 1.0,
        (true, Support::Optional) => 0.7,
        (true, Support::Excluded) => 0.1,
        (false, Support::Excluded) => 1.0,
        (false, Support::Optional) => 0.9,
        (false, Support::Included) => 0.6,
    }
}

fn requirements_score(
    pattern: &ArchitecturePattern,
    classification: &ClassificationResult,
    preferences: &UserPreferences,
    out: &mut PatternScore,
) -> f64 {
    use scoring::requirements as weights;

    let requires = |name: &str| {
        classification
            .infrastructure
            .as_ref()
            .is_some_and(|i| i.requires(name))
    };

    let checklist = [
        ("database", weights::DATABASE, pattern.database),
        ("auth", weights::AUTH, pattern.auth),
        ("realtime", weights::REALTIME, pattern.realtime),
        ("storage", weights::STORAGE, pattern.storage),
    ];

    let mut total = 0.0;
    for (name, weight, support) in checklist {
        let needed = requires(name);
        match (needed, support) {
            (true, Support::Included) => out.reasons.push(format!("Provides {}", name)),
            (true, Support::Excluded) => out
                .warnings
                .push(format!("Requires {} but the pattern excludes it", name)),
            _ => {}
        }
        total += weight * support_score(needed, support);
    }

    let expected = expected_traffic(classification, preferences);
    let shortfall = expected.rank().saturating_sub(pattern.traffic.rank());
    let traffic = match shortfall {
        0 => 1.0,
        1 => 0.5,
        _ => 0.2,
    };
    if shortfall > 0 {
        out.warnings.push(format!(
            "Expected {} traffic exceeds {} capacity",
            expected, pattern.traffic
        ));
    }
    total += weights::TRAFFIC * traffic;

    total
}

/// Expected traffic: explicit preference, else a traffic/scaling requirement,
/// else inferred from infrastructure complexity
fn expected_traffic(classification: &ClassificationResult, preferences: &UserPreferences) -> Tier {
    if let Some(tier) = preferences.expected_traffic {
        return tier;
    }

    let Some(infra) = classification.infrastructure.as_ref() else {
        return Tier::Low;
    };

    if infra.requires("traffic") || infra.requires("scaling") {
        Tier::High
    } else if infra.complexity >= 4 {
        Tier::High
    } else if infra.complexity >= 3 {
        Tier::Medium
    } else {
        Tier::Low
    }
}

/// Mean of the active preference components, neutral when none is set
fn suitability(pattern: &ArchitecturePattern, preferences: &UserPreferences) -> f64 {
    if !preferences.has_priorities() {
        return scoring::NEUTRAL_SUITABILITY;
    }

    let mut components = Vec::with_capacity(3);

    if preferences.prioritize_cost {
        components.push(match pattern.cost {
            Tier::Low => 1.0,
            Tier::Medium => 0.6,
            Tier::High => 0.2,
        });
    }
    if preferences.prioritize_simplicity {
        let c = i32::from(pattern.complexity).clamp(complexity::MIN, complexity::MAX);
        let span = f64::from(complexity::MAX - complexity::MIN);
        components.push(1.0 - f64::from(c - complexity::MIN) / span);
    }
    if preferences.prioritize_scalability {
        components.push(match pattern.traffic {
            Tier::High => 1.0,
            Tier::Medium => 0.6,
            Tier::Low => 0.2,
        });
    }

    components.iter().sum::<f64>() / components.len() as f64
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AppTypeDetection, FrameworkDetection, InfrastructureProfile};

    fn classification(
        framework: &str,
        app_type: AppType,
        infra: InfrastructureProfile,
    ) -> ClassificationResult {
        ClassificationResult::new(
            FrameworkDetection::new(framework, 0.9),
            AppTypeDetection::new(app_type, 0.9),
            infra,
        )
    }

    fn pattern(id: &str) -> ArchitecturePattern {
        PatternCatalog::builtin().get(id).unwrap().clone()
    }

    #[test]
    fn test_support_decision_table() {
        assert_eq!(support_score(true, Support::Included), 1.0);
        assert_eq!(support_score(true, Support::Optional), 0.7);
        assert_eq!(support_score(true, Support::Excluded), 0.1);
        assert_eq!(support_score(false, Support::Excluded), 1.0);
        assert_eq!(support_score(false, Support::Optional), 0.9);
        assert_eq!(support_score(false, Support::Included), 0.6);
    }

    #[test]
    fn test_static_site_prefers_cdn() {
        let scorer = PatternScorer::default();
        let c = classification("hugo", AppType::Static, InfrastructureProfile::new(1, 0.9));

        let matches = scorer.match_patterns(&c, &UserPreferences::default());
        assert_eq!(matches[0].pattern_id, "static-cdn");
        assert!(matches[0].warnings.is_empty());
    }

    #[test]
    fn test_exact_fit_scores_full() {
        let scorer = PatternScorer::default();
        // static app, agnostic pattern, no requirements, low traffic
        let c = classification("hugo", AppType::Static, InfrastructureProfile::new(1, 0.9));
        let s = scorer.score(&pattern("static-cdn"), &c);

        // 0.35*1.0 + 0.25*0.8 + 0.40*(0.3+0.2+0.2+0.15*0.9+0.15)
        let expected = 0.35 + 0.25 * 0.8 + 0.40 * (0.30 + 0.20 + 0.20 + 0.135 + 0.15);
        assert!((s.score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_database_against_static_pattern_warns() {
        let scorer = PatternScorer::default();
        let c = classification(
            "express",
            AppType::Api,
            InfrastructureProfile::new(2, 0.8).with_requirement("database", true, 0.9),
        );
        let s = scorer.score(&pattern("static-cdn"), &c);

        assert!(s.warnings.iter().any(|w| w.contains("database")));
        assert!(s.warnings.iter().any(|w| w.contains("Not designed for api")));
    }

    #[test]
    fn test_framework_family_match() {
        let scorer = PatternScorer::default();
        // koa is backend like the listed express/nodejs
        let c = classification("koa", AppType::Api, InfrastructureProfile::new(2, 0.8));
        let s = scorer.score(&pattern("serverless-api"), &c);
        assert!(s.reasons.iter().any(|r| r.contains("backend frameworks like koa")));
    }

    #[test]
    fn test_compatible_app_type() {
        let compat = AppTypeCompatibility::default();
        assert!(compat.compatible(AppType::Static, AppType::Spa));
        assert!(compat.compatible(AppType::Fullstack, AppType::Ssr));
        assert!(!compat.compatible(AppType::Static, AppType::Api));
    }

    #[test]
    fn test_traffic_shortfall() {
        let scorer = PatternScorer::default();
        let c = classification("rails", AppType::Fullstack, InfrastructureProfile::new(3, 0.8));
        let prefs = UserPreferences {
            expected_traffic: Some(Tier::High),
            ..Default::default()
        };
        let s = scorer.score_with(&pattern("monolith-vm"), &c, &prefs);
        assert!(s.warnings.iter().any(|w| w.contains("high traffic exceeds medium")));
    }

    #[test]
    fn test_expected_traffic_inference() {
        let prefs = UserPreferences::default();
        let scaling = classification(
            "react",
            AppType::Spa,
            InfrastructureProfile::new(1, 0.8).with_requirement("scaling", true, 0.6),
        );
        assert_eq!(expected_traffic(&scaling, &prefs), Tier::High);

        let medium = classification("react", AppType::Spa, InfrastructureProfile::new(3, 0.8));
        assert_eq!(expected_traffic(&medium, &prefs), Tier::Medium);

        let low = classification("react", AppType::Spa, InfrastructureProfile::new(1, 0.8));
        assert_eq!(expected_traffic(&low, &prefs), Tier::Low);
    }

    #[test]
    fn test_suitability() {
        let cdn = pattern("static-cdn");
        let micro = pattern("microservices");

        assert_eq!(suitability(&cdn, &UserPreferences::default()), 0.5);

        // Expected traffic alone is not a priority
        let traffic_only = UserPreferences {
            expected_traffic: Some(Tier::High),
            ..Default::default()
        };
        assert!(!traffic_only.has_priorities());
        assert_eq!(suitability(&micro, &traffic_only), 0.5);

        let cost = UserPreferences {
            prioritize_cost: true,
            ..Default::default()
        };
        assert!(cost.has_priorities());
        assert_eq!(suitability(&cdn, &cost), 1.0);
        assert!((suitability(&micro, &cost) - 0.2).abs() < 1e-9);

        let simple = UserPreferences {
            prioritize_simplicity: true,
            ..Default::default()
        };
        assert_eq!(suitability(&cdn, &simple), 1.0);
        assert_eq!(suitability(&micro, &simple), 0.0);
    }

    #[test]
    fn test_priorities_reorder_matches() {
        let scorer = PatternScorer::default();
        let c = classification(
            "express",
            AppType::Api,
            InfrastructureProfile::new(3, 0.8)
                .with_requirement("database", true, 0.9)
                .with_requirement("auth", true, 0.8),
        );

        let cheap = UserPreferences {
            prioritize_cost: true,
            ..Default::default()
        };
        let scalable = UserPreferences {
            prioritize_scalability: true,
            ..Default::default()
        };

        let by_cost = scorer.match_patterns(&c, &cheap);
        let by_scale = scorer.match_patterns(&c, &scalable);
        let micro_rank = |m: &[ArchitecturePatternMatch]| {
            m.iter().position(|p| p.pattern_id == "microservices")
        };
        assert!(micro_rank(&by_scale) < micro_rank(&by_cost) || micro_rank(&by_cost).is_none());
    }

    #[test]
    fn test_ranking_invariants() {
        let scorer = PatternScorer::default().with_max_results(3);
        let c = classification("nextjs", AppType::Ssr, InfrastructureProfile::new(2, 0.7));
        let matches = scorer.match_patterns(&c, &UserPreferences::default());

        assert!(matches.len() <= 3);
        for pair in matches.windows(2) {
            assert!(pair[0].rank >= pair[1].rank);
        }
        for m in &matches {
            assert!(m.score >= scoring::SCORE_FLOOR);
            assert!((0.0..=1.0).contains(&m.confidence));
        }
    }

    #[test]
    fn test_unknown_classification_still_ranks() {
        let scorer = PatternScorer::default();
        let matches = scorer.match_patterns(&ClassificationResult::empty(), &UserPreferences::default());
        assert!(!matches.is_empty());
        assert!(matches.iter().all(|m| m.score >= scoring::SCORE_FLOOR));
    }
}
