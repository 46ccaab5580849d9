//! Consensus Combiner - merge independent classification results
//!
//! Each analysis pass (file-based, description-based, ...) produces its own
//! classification. The combiner reconciles them:
//!
//! - **framework / appType**: weighted vote. Each candidate accrues a support
//!   score blending how often it was seen with how confidently it was seen.
//!   Placeholder values (`unknown`) are excluded so one strong source is not
//!   drowned out by several uninformed ones.
//! - **infrastructure**: requirement flags are OR-ed, per-requirement confidence
//!   is the max across sources, complexity is the rounded mean.
//! - **confidence**: fixed-weight blend over the merged sub-fields.
//!
//! Ties in support score go to the candidate seen first. This keeps output
//! reproducible but is otherwise arbitrary.

use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::constants::{complexity, support};
use crate::types::{
    ClassificationResult, Detection, InfrastructureProfile, Label, Requirement, Result, Scored,
    StackError, blend_confidence,
};

/// Per-candidate tally used while voting
struct Tally<T> {
    id: T,
    count: usize,
    confidence_sum: f64,
}

/// Merges N classification results into one consensus result
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsensusCombiner;

impl ConsensusCombiner {
    pub fn new() -> Self {
        Self
    }

    /// Combine results into one consensus classification.
    ///
    /// A single result is returned unchanged. Fails on empty input or on a
    /// non-finite confidence anywhere in the inputs.
    pub fn combine(&self, results: &[ClassificationResult]) -> Result<ClassificationResult> {
        let (first, rest) = results.split_first().ok_or(StackError::EmptyInput)?;
        if rest.is_empty() {
            return Ok(first.clone());
        }

        for (idx, result) in results.iter().enumerate() {
            ensure_finite(result, idx)?;
        }

        let total = results.len();

        let framework = vote(
            results.iter().map(|r| r.framework.as_ref()),
            total,
            support::FRAMEWORK_FREQUENCY,
            support::FRAMEWORK_CONFIDENCE,
        );
        let app_type = vote(
            results.iter().map(|r| r.app_type.as_ref()),
            total,
            support::APP_TYPE_FREQUENCY,
            support::APP_TYPE_CONFIDENCE,
        );
        let infrastructure = merge_infrastructure(results);

        let confidence = blend_confidence(
            framework.confidence,
            app_type.confidence,
            infrastructure.confidence,
        );

        let combined = ClassificationResult {
            framework: Some(framework),
            app_type: Some(app_type),
            infrastructure: Some(infrastructure),
            confidence: Some(confidence),
            timestamp: Some(Utc::now()),
            sources: results
                .iter()
                .fold(0usize, |acc, r| acc.saturating_add(r.sources.max(1))),
            fallbacks_applied: BTreeSet::new(),
            original_confidence: None,
        };

        debug!("Combined {} results: {}", total, combined.summary());

        Ok(combined)
    }
}

/// Weighted vote over one sub-field
fn vote<'a, T: Label + 'a>(
    detections: impl Iterator<Item = Option<&'a Detection<T>>>,
    total: usize,
    frequency_weight: f64,
    confidence_weight: f64,
) -> Detection<T> {
    let mut tallies: Vec<Tally<T>> = Vec::new();

    for detection in detections.flatten() {
        if detection.id.is_placeholder() {
            continue;
        }
        match tallies.iter_mut().find(|t| t.id == detection.id) {
            Some(tally) => {
                tally.count += 1;
                tally.confidence_sum += detection.confidence;
            }
            None => tallies.push(Tally {
                id: detection.id.clone(),
                count: 1,
                confidence_sum: detection.confidence,
            }),
        }
    }

    let mut ranked: Vec<Scored<T>> = tallies
        .into_iter()
        .map(|t| {
            let frequency = t.count as f64 / total as f64;
            let mean_confidence = t.confidence_sum / t.count as f64;
            let support =
                (frequency_weight * frequency + confidence_weight * mean_confidence).clamp(0.0, 1.0);
            Scored::new(t.id, support)
        })
        .collect();

    // Stable sort: equal support keeps first-seen order
    ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    if ranked.is_empty() {
        return Detection::unknown();
    }
    let winner = ranked.remove(0);

    Detection {
        id: winner.id,
        confidence: winner.confidence,
        alternatives: ranked,
        fallback: false,
        reason: None,
    }
}

/// OR on `required`, max on confidence, rounded mean on complexity
fn merge_infrastructure(results: &[ClassificationResult]) -> InfrastructureProfile {
    let profiles: Vec<&InfrastructureProfile> = results
        .iter()
        .filter_map(|r| r.infrastructure.as_ref())
        .collect();

    if profiles.is_empty() {
        return InfrastructureProfile::default();
    }

    let mut requirements: BTreeMap<String, Requirement> = BTreeMap::new();
    for profile in &profiles {
        for (name, requirement) in &profile.requirements {
            let merged = requirements
                .entry(name.clone())
                .or_insert(Requirement::new(false, 0.0));
            merged.required |= requirement.required;
            merged.confidence = merged.confidence.max(requirement.confidence);
        }
    }

    let count = profiles.len() as f64;
    let mean_complexity = profiles.iter().map(|p| p.complexity as f64).sum::<f64>() / count;
    let mean_confidence = profiles.iter().map(|p| p.confidence).sum::<f64>() / count;

    InfrastructureProfile {
        requirements,
        complexity: (mean_complexity.round() as i32).clamp(complexity::MIN, complexity::MAX),
        confidence: mean_confidence.clamp(0.0, 1.0),
        fallback: false,
        reason: None,
    }
}

fn ensure_finite(result: &ClassificationResult, idx: usize) -> Result<()> {
    let check = |field: &str, value: f64| {
        if value.is_finite() {
            Ok(())
        } else {
            Err(StackError::non_finite(format!("results[{}].{}", idx, field)))
        }
    };

    if let Some(framework) = &result.framework {
        check("framework.confidence", framework.confidence)?;
    }
    if let Some(app_type) = &result.app_type {
        check("appType.confidence", app_type.confidence)?;
    }
    if let Some(infra) = &result.infrastructure {
        check("infrastructure.confidence", infra.confidence)?;
        for (name, requirement) in &infra.requirements {
            check(
                &format!("infrastructure.requirements.{}.confidence", name),
                requirement.confidence,
            )?;
        }
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
