//! Recommend Command
//!
//! Builds the consensus classification, then ranks deployment architectures
//! against it. Priority flags are OR-ed with `[preferences]` from config.

use std::path::PathBuf;

use crate::analysis::AnalysisProcessor;
use crate::cli::ui::{Output, render};
use crate::cli::util::{OutputFormat, load_results};
use crate::config::ConfigLoader;
use crate::types::{Result, Tier};

/// Options for the recommend command
#[derive(Debug, Clone, Default)]
pub struct RecommendOptions {
    pub files: Vec<PathBuf>,
    pub description: Option<String>,
    /// Overrides `patterns.catalog`
    pub catalog: Option<PathBuf>,
    pub prioritize_cost: bool,
    pub prioritize_simplicity: bool,
    pub prioritize_scalability: bool,
    /// Overrides `preferences.traffic`
    pub traffic: Option<Tier>,
    /// Overrides `patterns.max_results`
    pub limit: Option<usize>,
    pub format: OutputFormat,
}

pub fn run(options: RecommendOptions) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    if let Some(catalog) = options.catalog {
        config.patterns.catalog = Some(catalog);
    }
    if let Some(limit) = options.limit {
        config.patterns.max_results = limit;
    }
    config.validate()?;

    let mut preferences = config.preferences.to_preferences();
    preferences.prioritize_cost |= options.prioritize_cost;
    preferences.prioritize_simplicity |= options.prioritize_simplicity;
    preferences.prioritize_scalability |= options.prioritize_scalability;
    if options.traffic.is_some() {
        preferences.expected_traffic = options.traffic;
    }

    let processor = AnalysisProcessor::from_config(&config)?;
    let loaded = load_results(&options.files, options.description.as_deref())?;
    let recommendation = processor.recommend(Some(&loaded.input), &loaded.results, &preferences);

    match options.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&recommendation)?),
        OutputFormat::Text => {
            let out = Output::new();
            render::analysis(&out, &recommendation.analysis);
            render::matches(&out, processor.scorer().catalog(), &recommendation.matches);
        }
    }

    Ok(())
}
