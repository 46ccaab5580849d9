//! Analysis Processor - the pipeline entry point
//!
//! ```text
//! input ──► cache? ──hit──► re-validate ──────────────────────────► out
//!             │
//!            miss
//!             ▼
//! sources ─► validate each ─► vote in-range ─► validate ─► fallback? ─► stamp
//!                                                                      │
//!                                            cache if valid ◄─ re-validate
//! ```
//!
//! Only sources with out-of-range or non-finite values are kept out of the
//! vote. A source that merely lacks the derived `confidence` or `timestamp`
//! still counts.
//!
//! Processing never fails outright. Empty input or non-finite numbers produce a
//! degraded result (the first source passed through, or an empty placeholder)
//! whose report carries the error at level `error`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::cache::ResultCache;
use super::combiner::ConsensusCombiner;
use super::fallback::FallbackResolver;
use super::validator::ClassificationValidator;
use crate::config::Config;
use crate::patterns::{AppTypeCompatibility, PatternCatalog, PatternScorer};
use crate::types::{
    AnalysisInput, ArchitecturePatternMatch, ClassificationResult, Result, StackError,
    UserPreferences, ValidationReport,
};

/// Output of one processing call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedAnalysis {
    pub result: ClassificationResult,
    pub report: ValidationReport,
    /// One report per input source, in input order; empty on a cache hit
    pub source_reports: Vec<ValidationReport>,
    pub from_cache: bool,
    /// The fallback resolver changed the consensus
    pub fallback_applied: bool,
}

impl ProcessedAnalysis {
    /// Failure outcome. `result` holds exactly one input unchanged (the first)
    /// since a single classification is returned. The remaining inputs are not
    /// merged but each keeps its own entry in `source_reports`.
    fn degraded(
        result: ClassificationResult,
        source_reports: Vec<ValidationReport>,
        error: &StackError,
    ) -> Self {
        Self {
            result,
            report: ValidationReport::error(error.to_string()),
            source_reports,
            from_cache: false,
            fallback_applied: false,
        }
    }
}

/// Consensus plus ranked deployment patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub analysis: ProcessedAnalysis,
    pub matches: Vec<ArchitecturePatternMatch>,
}

/// Runs the full consensus pipeline over independent classification results
pub struct AnalysisProcessor {
    validator: ClassificationValidator,
    combiner: ConsensusCombiner,
    resolver: FallbackResolver,
    cache: Option<ResultCache>,
    scorer: PatternScorer,
}

impl Default for AnalysisProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisProcessor {
    /// Processor with a default cache and the built-in pattern catalog
    pub fn new() -> Self {
        Self {
            validator: ClassificationValidator::new(),
            combiner: ConsensusCombiner::new(),
            resolver: FallbackResolver::new(),
            cache: Some(ResultCache::default()),
            scorer: PatternScorer::default(),
        }
    }

    /// Build from configuration; fails only if a configured catalog cannot be loaded
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = match &config.patterns.catalog {
            Some(path) => PatternCatalog::load(path)?,
            None => PatternCatalog::builtin(),
        };
        let scorer = PatternScorer::new(catalog, AppTypeCompatibility::default())
            .with_max_results(config.patterns.max_results);

        let cache = config
            .cache
            .enabled
            .then(|| ResultCache::with_config(&config.cache));

        Ok(Self {
            cache,
            scorer,
            ..Self::new()
        })
    }

    /// Builder: replace or remove the result cache
    pub fn with_cache(mut self, cache: Option<ResultCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Builder: replace the pattern scorer
    pub fn with_scorer(mut self, scorer: PatternScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn cache(&self) -> Option<&ResultCache> {
        self.cache.as_ref()
    }

    pub fn scorer(&self) -> &PatternScorer {
        &self.scorer
    }

    /// Process classification results into one validated consensus
    pub fn process(
        &self,
        input: Option<&AnalysisInput>,
        results: &[ClassificationResult],
    ) -> ProcessedAnalysis {
        let key = input.map(ResultCache::key_for);

        if let (Some(cache), Some(key)) = (&self.cache, &key)
            && let Some(cached) = cache.lookup(key)
        {
            debug!("Cache hit: {}", key);
            let report = self.validator.validate(&cached);
            let fallback_applied = !cached.fallbacks_applied.is_empty();
            return ProcessedAnalysis {
                result: cached,
                report,
                source_reports: Vec::new(),
                from_cache: true,
                fallback_applied,
            };
        }

        match self.run(results) {
            Ok(processed) => {
                if processed.report.is_valid
                    && let (Some(cache), Some(key)) = (&self.cache, key)
                {
                    cache.store(key, processed.result.clone());
                }
                processed
            }
            Err(e) => {
                warn!("Processing failed, passing input through: {}", e);
                let passthrough = results
                    .first()
                    .cloned()
                    .unwrap_or_else(ClassificationResult::empty);
                ProcessedAnalysis::degraded(passthrough, self.validate_sources(results), &e)
            }
        }
    }

    /// Process, then rank architecture patterns against the consensus
    pub fn recommend(
        &self,
        input: Option<&AnalysisInput>,
        results: &[ClassificationResult],
        preferences: &UserPreferences,
    ) -> Recommendation {
        let analysis = self.process(input, results);
        let matches = self.scorer.match_patterns(&analysis.result, preferences);

        if let Some(best) = matches.first() {
            info!(
                "Top pattern: {} (rank {:.2}, {} candidates)",
                best.pattern_id,
                best.rank,
                matches.len()
            );
        }

        Recommendation { analysis, matches }
    }

    fn run(&self, results: &[ClassificationResult]) -> Result<ProcessedAnalysis> {
        if results.is_empty() {
            return Err(StackError::EmptyInput);
        }

        let source_reports = self.validate_sources(results);

        // Missing derived fields are expected from extractors; bad numbers are not
        let votable: Vec<ClassificationResult> = results
            .iter()
            .zip(&source_reports)
            .filter(|(_, report)| !report.has_range_issues())
            .map(|(result, _)| result.clone())
            .collect();

        debug!(
            "{} of {} sources eligible for the vote",
            votable.len(),
            results.len()
        );

        let consensus = if votable.is_empty() {
            self.combiner.combine(results)?
        } else {
            self.combiner.combine(&votable)?
        };

        let report = self.validator.validate(&consensus);
        let mut result = if report.needs_fallback() {
            debug!(
                "Consensus needs fallback (valid: {}, level: {})",
                report.is_valid, report.confidence_level
            );
            self.resolver.resolve(&consensus, &report)
        } else {
            consensus.clone()
        };
        let fallback_applied = result != consensus;

        if result.timestamp.is_none() {
            result.timestamp = Some(Utc::now());
        }

        let report = self.validator.validate(&result);
        info!("Consensus ({}): {}", report.confidence_level, result.summary());

        Ok(ProcessedAnalysis {
            result,
            report,
            source_reports,
            from_cache: false,
            fallback_applied,
        })
    }

    fn validate_sources(&self, results: &[ClassificationResult]) -> Vec<ValidationReport> {
        results.iter().map(|r| self.validator.validate(r)).collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AppType, AppTypeDetection, ConfidenceLevel, FallbackField, FrameworkDetection,
        InfrastructureProfile,
    };

    fn classification(framework: &str, app_type: AppType, conf: f64) -> ClassificationResult {
        ClassificationResult::new(
            FrameworkDetection::new(framework, conf),
            AppTypeDetection::new(app_type, conf),
            InfrastructureProfile::new(1, conf),
        )
    }

    fn processor() -> AnalysisProcessor {
        AnalysisProcessor::new()
    }

    #[test]
    fn test_confident_sources_pass_without_fallback() {
        let out = processor().process(
            None,
            &[
                classification("react", AppType::Spa, 0.9),
                classification("react", AppType::Spa, 0.8),
            ],
        );

        assert!(out.report.is_valid);
        assert!(!out.fallback_applied);
        assert!(!out.from_cache);
        assert_eq!(out.source_reports.len(), 2);
        assert_eq!(out.result.framework_id(), Some("react"));
        assert_eq!(out.result.sources, 2);
    }

    #[test]
    fn test_partial_source_triggers_fallback() {
        // Source without overall confidence or timestamp is structurally invalid
        let partial = ClassificationResult {
            framework: Some(FrameworkDetection::new("unknown", 0.2)),
            app_type: Some(AppTypeDetection::new(AppType::Api, 0.8)),
            infrastructure: Some(InfrastructureProfile::new(2, 0.6)),
            ..ClassificationResult::empty()
        };

        let out = processor().process(None, &[partial]);

        assert!(out.report.is_valid);
        assert!(out.fallback_applied);
        assert_eq!(out.result.framework_id(), Some("nodejs"));
        assert!(out.result.fallbacks_applied.contains(&FallbackField::Framework));
        assert!(out.result.timestamp.is_some());
        assert!(out.result.original_confidence.is_some());
    }

    #[test]
    fn test_sources_without_derived_fields_still_vote() {
        // Extractor output: no overall confidence, no timestamp
        let extracted = r#"{
            "framework": {"id": "vue", "confidence": 0.9},
            "appType": {"id": "spa", "confidence": 0.9},
            "infrastructure": {"complexity": 1, "confidence": 0.9}
        }"#;
        let vue: ClassificationResult = serde_json::from_str(extracted).unwrap();
        assert!(vue.confidence.is_none());

        let out = processor().process(
            None,
            &[classification("react", AppType::Spa, 0.9), vue.clone(), vue],
        );

        assert!(!out.source_reports[1].is_valid);
        assert_eq!(out.result.framework_id(), Some("vue"));
        assert_eq!(out.result.sources, 3);
        let alternatives = &out.result.framework.as_ref().unwrap().alternatives;
        assert_eq!(alternatives.len(), 1);
        assert_eq!(alternatives[0].id, "react");
        assert!(out.report.is_valid);
    }

    #[test]
    fn test_out_of_range_sources_excluded_from_vote() {
        let mut broken = classification("vue", AppType::Spa, 0.9);
        broken.framework.as_mut().unwrap().confidence = 1.5;

        let out = processor().process(
            None,
            &[broken, classification("svelte", AppType::Spa, 0.7)],
        );

        assert_eq!(out.result.framework_id(), Some("svelte"));
        assert!(!out.source_reports[0].is_valid);
        assert!(out.source_reports[1].is_valid);
    }

    #[test]
    fn test_all_out_of_range_sources_still_combined() {
        let mut a = classification("vue", AppType::Spa, 0.9);
        let mut b = classification("vue", AppType::Spa, 0.8);
        a.infrastructure.as_mut().unwrap().complexity = 9;
        b.infrastructure.as_mut().unwrap().complexity = 9;

        let out = processor().process(None, &[a, b]);
        assert!(out.source_reports.iter().all(|r| r.has_range_issues()));
        assert_eq!(out.result.framework_id(), Some("vue"));
        assert_eq!(out.result.infrastructure.as_ref().unwrap().complexity, 5);
        assert!(out.report.is_valid);
    }

    #[test]
    fn test_empty_input_degrades() {
        let out = processor().process(None, &[]);

        assert!(!out.report.is_valid);
        assert_eq!(out.report.confidence_level, ConfidenceLevel::Error);
        assert_eq!(out.result, ClassificationResult::empty());
        assert!(out.report.issues[0].message.contains("No classification results"));
    }

    #[test]
    fn test_non_finite_input_degrades_with_passthrough() {
        let mut a = classification("vue", AppType::Spa, 0.9);
        let mut b = classification("react", AppType::Spa, 0.8);
        a.framework.as_mut().unwrap().confidence = f64::NAN;
        b.framework.as_mut().unwrap().confidence = f64::INFINITY;

        let out = processor().process(None, &[a.clone(), b]);

        assert_eq!(out.report.confidence_level, ConfidenceLevel::Error);
        assert_eq!(out.result.framework_id(), Some("vue"));
        assert!(out.result.framework.as_ref().unwrap().confidence.is_nan());
        // Every input keeps its own diagnostics
        assert_eq!(out.source_reports.len(), 2);
        assert!(out.source_reports.iter().all(|r| r.has_range_issues()));
    }

    #[test]
    fn test_cache_hit_on_second_call() {
        let processor = processor();
        let input = AnalysisInput::from_description("todo app").with_file("package.json", "{}");
        let sources = [classification("react", AppType::Spa, 0.9)];

        let first = processor.process(Some(&input), &sources);
        assert!(!first.from_cache);

        // Different sources, same input: the cached consensus wins
        let second = processor.process(Some(&input), &[classification("vue", AppType::Spa, 0.9)]);
        assert!(second.from_cache);
        assert_eq!(second.result, first.result);
        assert!(second.report.is_valid);
        assert_eq!(processor.cache().unwrap().stats().hits, 1);
    }

    #[test]
    fn test_degraded_results_not_cached() {
        let processor = processor();
        let input = AnalysisInput::from_description("empty");

        processor.process(Some(&input), &[]);
        assert!(processor.cache().unwrap().is_empty());
    }

    #[test]
    fn test_without_cache() {
        let processor = processor().with_cache(None);
        let input = AnalysisInput::from_description("todo app");
        let sources = [classification("react", AppType::Spa, 0.9)];

        processor.process(Some(&input), &sources);
        let second = processor.process(Some(&input), &sources);
        assert!(!second.from_cache);
    }

    #[test]
    fn test_recommend_ranks_patterns() {
        let rec = processor().recommend(
            None,
            &[classification("hugo", AppType::Static, 0.9)],
            &UserPreferences::default(),
        );

        assert!(rec.analysis.report.is_valid);
        assert_eq!(rec.matches[0].pattern_id, "static-cdn");
    }

    #[test]
    fn test_injected_scorer_limits_candidates() {
        let microservices = PatternCatalog::builtin()
            .get("microservices")
            .unwrap()
            .clone();
        let catalog = PatternCatalog::new(vec![microservices]).unwrap();
        let processor = processor()
            .with_scorer(PatternScorer::new(catalog, AppTypeCompatibility::default()));

        let rec = processor.recommend(
            None,
            &[classification("react", AppType::Spa, 0.9)],
            &UserPreferences::default(),
        );

        assert_eq!(rec.matches.len(), 1);
        assert_eq!(rec.matches[0].pattern_id, "microservices");
    }

    #[test]
    fn test_from_config_disables_cache() {
        let mut config = Config::default();
        config.cache.enabled = false;
        config.patterns.max_results = 2;

        let processor = AnalysisProcessor::from_config(&config).unwrap();
        assert!(processor.cache().is_none());

        let rec = processor.recommend(
            None,
            &[classification("react", AppType::Spa, 0.9)],
            &UserPreferences::default(),
        );
        assert!(rec.matches.len() <= 2);
    }
}
