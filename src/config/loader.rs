//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/stackwise/config.toml)
//! 3. Project config (.stackwise/config.toml)
//! 4. Environment variables (STACKWISE_* prefix, `__` between sections)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{Result, StackError};

const ENV_PREFIX: &str = "STACKWISE_";
const PROJECT_DIR: &str = ".stackwise";
const CONFIG_FILE: &str = "config.toml";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        Self::load_layers(
            Self::global_config_path().as_deref(),
            &Self::project_config_path(),
        )
    }

    /// Load with explicit global and project file locations; missing files are skipped
    pub fn load_layers(global: Option<&Path>, project: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(global_path));
        }

        if project.exists() {
            debug!("Loading project config from: {}", project.display());
            figment = figment.merge(Toml::file(project));
        }

        // e.g. STACKWISE_CACHE__TTL_SECS -> cache.ttl_secs
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| StackError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| StackError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/stackwise/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("stackwise"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join(CONFIG_FILE))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join(CONFIG_FILE)
    }

    /// Get project data directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(PROJECT_DIR)
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize global configuration
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            StackError::Config("Cannot determine global config directory".to_string())
        })?;

        Self::write_config(&global_dir, Self::default_global_config(), force)
    }

    /// Initialize project configuration in the current directory
    pub fn init_project(force: bool) -> Result<PathBuf> {
        Self::init_project_at(Path::new("."), force)
    }

    /// Initialize project configuration under `root`
    pub fn init_project_at(root: &Path, force: bool) -> Result<PathBuf> {
        Self::write_config(
            &root.join(PROJECT_DIR),
            Self::default_project_config(),
            force,
        )
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn write_config(dir: &Path, content: &str, force: bool) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;

        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() || force {
            fs::write(&config_path, content)?;
            info!("Created config: {}", config_path.display());
        } else {
            info!("Config exists: {}", config_path.display());
        }

        Ok(config_path)
    }

    /// Generate default global config content (TOML)
    fn default_global_config() -> &'static str {
        r#"# Stackwise Global Configuration
# User-wide defaults. Project settings in .stackwise/config.toml override these.

version = "1.0"

# Result cache (in-process, per invocation)
[cache]
enabled = true
capacity = 100
ttl_secs = 1800

# Pattern ranking
[patterns]
max_results = 5
"#
    }

    /// Generate default project config content (TOML)
    fn default_project_config() -> &'static str {
        r#"# Stackwise Project Configuration
# Project-specific settings that override global defaults.

version = "1.0"

[patterns]
# catalog = "patterns.yaml"
max_results = 5

# Default ranking priorities; CLI flags override
[preferences]
prioritize_cost = false
prioritize_simplicity = false
prioritize_scalability = false
# traffic = "medium"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_layers_yield_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigLoader::load_layers(
            Some(&temp_dir.path().join("global.toml")),
            &temp_dir.path().join("project.toml"),
        )
        .unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.patterns.max_results, 5);
    }

    #[test]
    fn test_project_overrides_global() {
        let temp_dir = TempDir::new().unwrap();
        let global = temp_dir.path().join("global.toml");
        let project = temp_dir.path().join("project.toml");
        fs::write(&global, "[patterns]\nmax_results = 8\n\n[cache]\nttl_secs = 60\n").unwrap();
        fs::write(&project, "[patterns]\nmax_results = 3\n").unwrap();

        let config = ConfigLoader::load_layers(Some(&global), &project).unwrap();
        assert_eq!(config.patterns.max_results, 3);
        assert_eq!(config.cache.ttl_secs, 60);
    }

    #[test]
    fn test_invalid_layer_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("project.toml");
        fs::write(&project, "[patterns]\nmax_results = 0\n").unwrap();

        let err = ConfigLoader::load_layers(None, &project).unwrap_err();
        assert!(matches!(err, StackError::Config(_)));
    }

    #[test]
    fn test_init_project_writes_loadable_config() {
        let temp_dir = TempDir::new().unwrap();

        let path = ConfigLoader::init_project_at(temp_dir.path(), false).unwrap();
        assert_eq!(path, temp_dir.path().join(".stackwise/config.toml"));

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config, crate::config::Config::default());
    }

    #[test]
    fn test_init_project_respects_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = ConfigLoader::init_project_at(temp_dir.path(), false).unwrap();
        fs::write(&path, "version = \"custom\"\n").unwrap();

        ConfigLoader::init_project_at(temp_dir.path(), false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "version = \"custom\"\n");

        ConfigLoader::init_project_at(temp_dir.path(), true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("[preferences]"));
    }

    #[test]
    fn test_env_override() {
        let temp_dir = TempDir::new().unwrap();
        // SAFETY: This test runs in isolation
        unsafe {
            std::env::set_var("STACKWISE_PREFERENCES__PRIORITIZE_SIMPLICITY", "true");
        }
        let config =
            ConfigLoader::load_layers(None, &temp_dir.path().join("project.toml")).unwrap();
        unsafe {
            std::env::remove_var("STACKWISE_PREFERENCES__PRIORITIZE_SIMPLICITY");
        }
        assert!(config.preferences.prioritize_simplicity);
    }
}
