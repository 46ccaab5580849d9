//! Human-readable rendering of processing results

use super::output::Output;
use crate::analysis::ProcessedAnalysis;
use crate::patterns::PatternCatalog;
use crate::types::{ArchitecturePatternMatch, ClassificationResult, ValidationReport};

/// Print a classification result's sub-fields
pub fn classification(out: &Output, result: &ClassificationResult) {
    match &result.framework {
        Some(fw) => {
            let tag = if fw.fallback { " (fallback)" } else { "" };
            out.field("Framework", format!("{} {:.2}{}", fw.id, fw.confidence, tag));
            if !fw.alternatives.is_empty() {
                let alts: Vec<String> = fw
                    .alternatives
                    .iter()
                    .map(|a| format!("{} {:.2}", a.id, a.confidence))
                    .collect();
                out.field("  alternatives", alts.join(", "));
            }
        }
        None => out.field("Framework", "-"),
    }

    match &result.app_type {
        Some(app) => {
            let tag = if app.fallback { " (fallback)" } else { "" };
            out.field("App type", format!("{} {:.2}{}", app.id, app.confidence, tag));
        }
        None => out.field("App type", "-"),
    }

    match &result.infrastructure {
        Some(infra) => {
            let required: Vec<&str> = infra
                .requirements
                .iter()
                .filter(|(_, r)| r.required)
                .map(|(name, _)| name.as_str())
                .collect();
            let required = if required.is_empty() {
                "none".to_string()
            } else {
                required.join(", ")
            };
            out.field(
                "Infrastructure",
                format!("{} (complexity {})", required, infra.complexity),
            );
        }
        None => out.field("Infrastructure", "-"),
    }

    out.field("Confidence", format!("{:.2}", result.overall_confidence()));
    if let Some(original) = result.original_confidence {
        out.field("  before", format!("{:.2}", original));
    }
    out.field("Sources", result.sources);
    if !result.fallbacks_applied.is_empty() {
        let fields: Vec<String> = result
            .fallbacks_applied
            .iter()
            .map(ToString::to_string)
            .collect();
        out.field("Fallbacks", fields.join(", "));
    }
}

/// Print a validation report: badge, issues, warnings, suggestions
pub fn report(out: &Output, report: &ValidationReport) {
    println!(
        "  {} {}",
        out.badge(report.confidence_level),
        if report.is_valid { "valid" } else { "invalid" }
    );
    for issue in report.issues.iter().chain(&report.warnings) {
        out.issue(issue);
    }
    for suggestion in &report.suggestions {
        out.info(suggestion);
    }
}

/// Print a full processing outcome
pub fn analysis(out: &Output, processed: &ProcessedAnalysis) {
    out.header("Consensus");
    if processed.from_cache {
        out.info("Served from cache");
    }
    classification(out, &processed.result);

    out.section("Validation");
    report(out, &processed.report);

    let invalid = processed
        .source_reports
        .iter()
        .filter(|r| !r.is_valid)
        .count();
    let total = processed.source_reports.len();
    if invalid > 0 && invalid == total {
        out.warning("No source passed validation; all were combined");
    } else if invalid > 0 {
        out.warning(&format!(
            "{} of {} sources failed validation and were excluded",
            invalid, total
        ));
    }
}

/// Print ranked pattern matches
pub fn matches(out: &Output, catalog: &PatternCatalog, matches: &[ArchitecturePatternMatch]) {
    out.section("Recommended Architectures");
    if matches.is_empty() {
        out.warning("No pattern scored above the minimum");
        return;
    }

    for (i, m) in matches.iter().enumerate() {
        let name = catalog
            .get(&m.pattern_id)
            .map(|p| p.name.as_str())
            .unwrap_or(m.pattern_id.as_str());
        println!(
            "\n  {}. {} ({})  rank {:.2}  score {:.2}  confidence {:.2}",
            i + 1,
            name,
            m.pattern_id,
            m.rank,
            m.score,
            m.confidence
        );
        for reason in &m.reasons {
            println!("     + {}", reason);
        }
        for warning in &m.warnings {
            println!("     - {}", warning);
        }
    }
}
