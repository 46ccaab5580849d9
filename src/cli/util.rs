//! CLI Common Utilities
//!
//! Shared input loading and output-format handling for CLI commands.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::types::{AnalysisInput, ClassificationResult, Result, StackError};

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Invalid format '{}'. Valid values: text, json",
                s
            )),
        }
    }
}

/// A results file holds either one classification or a list of them
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<ClassificationResult>),
    One(Box<ClassificationResult>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<ClassificationResult> {
        match self {
            OneOrMany::Many(results) => results,
            OneOrMany::One(result) => vec![*result],
        }
    }
}

/// Parse classification results from file content; YAML for .yaml/.yml, else JSON
pub fn parse_results(path: &Path, content: &str) -> Result<Vec<ClassificationResult>> {
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let parsed: OneOrMany = if is_yaml {
        serde_yaml::from_str(content).map_err(|e| StackError::input(path, e.to_string()))?
    } else {
        serde_json::from_str(content).map_err(|e| StackError::input(path, e.to_string()))?
    };

    let results = parsed.into_vec();
    if results.is_empty() {
        return Err(StackError::input(path, "file contains no classification results"));
    }
    Ok(results)
}

/// Loaded results plus the raw input they came from (for cache keying)
#[derive(Debug)]
pub struct LoadedResults {
    pub results: Vec<ClassificationResult>,
    pub input: AnalysisInput,
}

/// Load classification results from every file, in argument order
pub fn load_results(paths: &[PathBuf], description: Option<&str>) -> Result<LoadedResults> {
    let mut input = AnalysisInput::from_description(description.unwrap_or_default());
    let mut results = Vec::new();

    for path in paths {
        let content = std::fs::read_to_string(path)
            .map_err(|e| StackError::input(path, e.to_string()))?;
        results.extend(parse_results(path, &content)?);

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        input = input.with_file(name, content);
    }

    Ok(LoadedResults { results, input })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SINGLE: &str = r#"{
        "framework": { "id": "react", "confidence": 0.9 },
        "appType": { "id": "spa", "confidence": 0.8 },
        "infrastructure": { "complexity": 1, "confidence": 0.7 }
    }"#;

    #[test]
    fn test_parse_single_object() {
        let results = parse_results(Path::new("a.json"), SINGLE).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].framework_id(), Some("react"));
        assert!(results[0].confidence.is_none());
    }

    #[test]
    fn test_parse_array() {
        let content = format!("[{}, {}]", SINGLE, SINGLE);
        let results = parse_results(Path::new("a.json"), &content).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_parse_yaml() {
        let content = r#"
- framework: { id: django, confidence: 0.7 }
  appType: { id: api, confidence: 0.6 }
- framework: { id: flask, confidence: 0.4 }
"#;
        let results = parse_results(Path::new("r.yaml"), content).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].framework_id(), Some("flask"));
        assert!(results[1].app_type.is_none());
    }

    #[test]
    fn test_empty_array_rejected() {
        let err = parse_results(Path::new("a.json"), "[]").unwrap_err();
        assert!(matches!(err, StackError::Input { .. }));
    }

    #[test]
    fn test_malformed_reports_path() {
        let err = parse_results(Path::new("broken.json"), "{").unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_load_results_builds_input() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("files.json");
        let b = dir.path().join("description.json");
        std::fs::write(&a, SINGLE).unwrap();
        std::fs::write(&b, SINGLE).unwrap();

        let loaded = load_results(&[a, b], Some("todo app")).unwrap();
        assert_eq!(loaded.results.len(), 2);
        assert_eq!(loaded.input.description, "todo app");
        assert_eq!(loaded.input.file_names, vec!["files.json", "description.json"]);
        assert_eq!(loaded.input.file_contents.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_results(&[PathBuf::from("/nonexistent/x.json")], None).unwrap_err();
        assert!(matches!(err, StackError::Input { .. }));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
