//! Analyze Command
//!
//! Merges classification results from one or more files into a validated
//! consensus and prints it with diagnostics.
//!
//! Usage:
//!   stackwise analyze files.json description.json [--description TEXT] [-f json]

use std::path::PathBuf;

use tracing::debug;

use crate::analysis::AnalysisProcessor;
use crate::cli::ui::{Output, render};
use crate::cli::util::{OutputFormat, load_results};
use crate::config::ConfigLoader;
use crate::types::Result;

pub fn run(files: &[PathBuf], description: Option<&str>, format: OutputFormat) -> Result<()> {
    let config = ConfigLoader::load()?;
    let processor = AnalysisProcessor::from_config(&config)?;

    let loaded = load_results(files, description)?;
    debug!(
        "Loaded {} results from {} files",
        loaded.results.len(),
        files.len()
    );

    let processed = processor.process(Some(&loaded.input), &loaded.results);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&processed)?),
        OutputFormat::Text => render::analysis(&Output::new(), &processed),
    }

    Ok(())
}
