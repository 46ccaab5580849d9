//! Validate Command
//!
//! Validates every classification result in a file without merging them.
//! Exits non-zero when any result has hard issues.

use std::path::Path;

use serde::Serialize;

use crate::analysis::ClassificationValidator;
use crate::cli::ui::{Output, render};
use crate::cli::util::{OutputFormat, parse_results};
use crate::types::{ClassificationResult, Result, StackError, ValidationReport};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidatedResult<'a> {
    index: usize,
    result: &'a ClassificationResult,
    report: ValidationReport,
}

pub fn run(file: &Path, format: OutputFormat) -> Result<()> {
    let content =
        std::fs::read_to_string(file).map_err(|e| StackError::input(file, e.to_string()))?;
    let results = parse_results(file, &content)?;

    let validator = ClassificationValidator::new();
    let validated: Vec<ValidatedResult<'_>> = results
        .iter()
        .enumerate()
        .map(|(index, result)| ValidatedResult {
            index,
            result,
            report: validator.validate(result),
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&validated)?),
        OutputFormat::Text => {
            let out = Output::new();
            for v in &validated {
                out.header(&format!("Result #{}", v.index + 1));
                render::classification(&out, v.result);
                render::report(&out, &v.report);
            }
        }
    }

    let invalid = validated.iter().filter(|v| !v.report.is_valid).count();
    if invalid > 0 {
        return Err(StackError::input(
            file,
            format!("{} of {} results failed validation", invalid, validated.len()),
        ));
    }

    Ok(())
}
