//! Architecture pattern catalog
//!
//! The catalog is plain data injected into the scorer. A built-in set covers
//! the common deployment topologies; teams can replace it with their own file
//! (`patterns.catalog` in config, or `--catalog` on the CLI).
//!
//! File format (YAML shown; JSON and TOML use the same shape):
//!
//! ```yaml
//! patterns:
//!   - id: static-cdn
//!     name: Static Hosting + CDN
//!     appTypes: [static, spa]
//!     database: excluded
//!     traffic: high
//!     cost: low
//!     complexity: 1
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

use crate::constants::complexity;
use crate::types::{AppType, ArchitecturePattern, Result, StackError, Support, Tier};

#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    patterns: Vec<ArchitecturePattern>,
}

/// Ordered set of architecture patterns; order is the ranking tie-break
#[derive(Debug, Clone, PartialEq)]
pub struct PatternCatalog {
    patterns: Vec<ArchitecturePattern>,
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PatternCatalog {
    /// Build a catalog, rejecting duplicate ids and malformed entries
    pub fn new(patterns: Vec<ArchitecturePattern>) -> Result<Self> {
        let mut seen = HashSet::new();
        for pattern in &patterns {
            if pattern.id.trim().is_empty() {
                return Err(StackError::Catalog("pattern with empty id".to_string()));
            }
            if !seen.insert(pattern.id.as_str()) {
                return Err(StackError::Catalog(format!(
                    "duplicate pattern id '{}'",
                    pattern.id
                )));
            }
            if pattern.app_types.is_empty() {
                return Err(StackError::Catalog(format!(
                    "pattern '{}' lists no app types",
                    pattern.id
                )));
            }
            let c = i32::from(pattern.complexity);
            if !(complexity::MIN..=complexity::MAX).contains(&c) {
                return Err(StackError::Catalog(format!(
                    "pattern '{}' complexity {} outside {}..={}",
                    pattern.id,
                    pattern.complexity,
                    complexity::MIN,
                    complexity::MAX
                )));
            }
        }

        Ok(Self { patterns })
    }

    /// Load a catalog file; format is chosen by extension (yaml/yml, json, toml)
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let file: CatalogFile = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            "toml" => toml::from_str(&content)?,
            other => {
                return Err(StackError::Catalog(format!(
                    "unsupported catalog format '{}' for {}",
                    other,
                    path.display()
                )));
            }
        };

        debug!(
            "Loaded {} patterns from {}",
            file.patterns.len(),
            path.display()
        );
        Self::new(file.patterns)
    }

    pub fn patterns(&self) -> &[ArchitecturePattern] {
        &self.patterns
    }

    pub fn get(&self, id: &str) -> Option<&ArchitecturePattern> {
        self.patterns.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Built-in catalog of common deployment topologies
    pub fn builtin() -> Self {
        Self {
            patterns: builtin_patterns(),
        }
    }
}

fn frameworks(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

fn builtin_patterns() -> Vec<ArchitecturePattern> {
    vec![
        ArchitecturePattern {
            id: "static-cdn".to_string(),
            name: "Static Hosting + CDN".to_string(),
            description: "Prebuilt assets served from object storage behind a CDN".to_string(),
            app_types: vec![AppType::Static, AppType::Spa],
            frameworks: Vec::new(),
            database: Support::Excluded,
            auth: Support::Excluded,
            realtime: Support::Excluded,
            storage: Support::Optional,
            traffic: Tier::High,
            cost: Tier::Low,
            complexity: 1,
        },
        ArchitecturePattern {
            id: "jamstack".to_string(),
            name: "Jamstack + Serverless Functions".to_string(),
            description: "Static frontend with serverless functions and managed services"
                .to_string(),
            app_types: vec![AppType::Spa, AppType::Static, AppType::Ssr],
            frameworks: frameworks(&["react", "vue", "svelte", "gatsby", "nextjs", "astro"]),
            database: Support::Optional,
            auth: Support::Optional,
            realtime: Support::Excluded,
            storage: Support::Optional,
            traffic: Tier::High,
            cost: Tier::Low,
            complexity: 2,
        },
        ArchitecturePattern {
            id: "managed-ssr".to_string(),
            name: "Managed SSR Platform".to_string(),
            description: "Server-rendered framework on a managed edge/serverless platform"
                .to_string(),
            app_types: vec![AppType::Ssr, AppType::Fullstack],
            frameworks: frameworks(&["nextjs", "nuxt", "sveltekit", "remix"]),
            database: Support::Optional,
            auth: Support::Optional,
            realtime: Support::Optional,
            storage: Support::Optional,
            traffic: Tier::High,
            cost: Tier::Medium,
            complexity: 2,
        },
        ArchitecturePattern {
            id: "serverless-api".to_string(),
            name: "Serverless API".to_string(),
            description: "Function-per-route API with a managed database".to_string(),
            app_types: vec![AppType::Api],
            frameworks: frameworks(&["nodejs", "express", "fastify", "flask", "fastapi"]),
            database: Support::Included,
            auth: Support::Optional,
            realtime: Support::Optional,
            storage: Support::Optional,
            traffic: Tier::High,
            cost: Tier::Low,
            complexity: 3,
        },
        ArchitecturePattern {
            id: "container-service".to_string(),
            name: "Containerized Service".to_string(),
            description: "Long-running container behind a load balancer with a managed database"
                .to_string(),
            app_types: vec![AppType::Api, AppType::Fullstack],
            frameworks: Vec::new(),
            database: Support::Included,
            auth: Support::Included,
            realtime: Support::Optional,
            storage: Support::Optional,
            traffic: Tier::Medium,
            cost: Tier::Medium,
            complexity: 3,
        },
        ArchitecturePattern {
            id: "monolith-vm".to_string(),
            name: "Traditional Full-Stack Server".to_string(),
            description: "Single application server with co-located database and storage"
                .to_string(),
            app_types: vec![AppType::Fullstack, AppType::Ssr, AppType::Api],
            frameworks: frameworks(&["rails", "django", "laravel", "spring", "express", "nodejs"]),
            database: Support::Included,
            auth: Support::Included,
            realtime: Support::Included,
            storage: Support::Included,
            traffic: Tier::Medium,
            cost: Tier::Medium,
            complexity: 4,
        },
        ArchitecturePattern {
            id: "microservices".to_string(),
            name: "Kubernetes Microservices".to_string(),
            description: "Independently deployed services on a container orchestrator"
                .to_string(),
            app_types: vec![AppType::Api, AppType::Fullstack],
            frameworks: Vec::new(),
            database: Support::Included,
            auth: Support::Included,
            realtime: Support::Included,
            storage: Support::Included,
            traffic: Tier::High,
            cost: Tier::High,
            complexity: 5,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_catalog_is_well_formed() {
        let builtin = PatternCatalog::builtin();
        assert!(!builtin.is_empty());
        assert!(PatternCatalog::new(builtin.patterns().to_vec()).is_ok());
        assert!(builtin.get("static-cdn").is_some());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut patterns = builtin_patterns();
        patterns.push(patterns[0].clone());
        let err = PatternCatalog::new(patterns).unwrap_err();
        assert!(err.to_string().contains("duplicate pattern id"));
    }

    #[test]
    fn test_out_of_range_complexity_rejected() {
        let mut patterns = builtin_patterns();
        patterns[0].complexity = 9;
        assert!(PatternCatalog::new(patterns).is_err());
    }

    #[test]
    fn test_load_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.yaml");
        std::fs::write(
            &path,
            r#"
patterns:
  - id: edge
    name: Edge Functions
    appTypes: [api]
    database: excluded
    traffic: high
    cost: low
    complexity: 2
"#,
        )
        .unwrap();

        let catalog = PatternCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        let edge = catalog.get("edge").unwrap();
        assert_eq!(edge.database, Support::Excluded);
        assert_eq!(edge.auth, Support::Optional);
        assert!(edge.frameworks.is_empty());
    }

    #[test]
    fn test_load_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(
            &path,
            r#"
[[patterns]]
id = "paas"
name = "Platform as a Service"
appTypes = ["fullstack", "api"]
frameworks = ["rails"]
database = "included"
"#,
        )
        .unwrap();

        let catalog = PatternCatalog::load(&path).unwrap();
        let paas = catalog.get("paas").unwrap();
        assert_eq!(paas.complexity, 3);
        assert_eq!(paas.app_types, vec![AppType::Fullstack, AppType::Api]);
    }

    #[test]
    fn test_load_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.ini");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            PatternCatalog::load(&path),
            Err(StackError::Catalog(_))
        ));
    }
}
