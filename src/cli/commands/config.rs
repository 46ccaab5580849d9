//! Config Command
//!
//! Manage Stackwise configuration.
//!
//! Usage:
//!   stackwise config show [-f json]
//!   stackwise config path
//!   stackwise config init [-g] [--force]

use crate::cli::ui::Output;
use crate::cli::util::OutputFormat;
use crate::config::ConfigLoader;
use crate::types::{Result, StackError};

/// Show the effective configuration (merged from all sources)
pub fn show(format: OutputFormat) -> Result<()> {
    let config = ConfigLoader::load()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => println!(
            "{}",
            toml::to_string_pretty(&config).map_err(|e| StackError::Config(e.to_string()))?
        ),
    }

    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    println!("Configuration paths:");
    println!();

    if let Some(global) = ConfigLoader::global_config_path() {
        let exists = if global.exists() { "✓" } else { "✗" };
        println!("  Global:  {} {}", exists, global.display());
    } else {
        println!("  Global:  (not available)");
    }

    let project = ConfigLoader::project_config_path();
    let exists = if project.exists() { "✓" } else { "✗" };
    println!("  Project: {} {}", exists, project.display());

    Ok(())
}

/// Initialize global or project configuration
pub fn init(global: bool, force: bool) -> Result<()> {
    let out = Output::new();

    let path = if global {
        ConfigLoader::init_global(force)?
    } else {
        ConfigLoader::init_project(force)?
    };

    let scope = if global { "global" } else { "project" };
    out.success(&format!("Initialized {} configuration", scope));
    println!("  Config:    {}", path.display());
    Ok(())
}
