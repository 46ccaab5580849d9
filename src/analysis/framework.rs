//! Framework knowledge table
//!
//! Maps known framework ids to families. Shared by the validator (consistency
//! heuristics), the fallback resolver (cross-inference) and the pattern scorer
//! (same-family matches). Lookups are case-insensitive.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::AppType;

const FRONTEND: &[&str] = &[
    "react", "vue", "angular", "svelte", "preact", "solid", "ember", "jquery", "lit", "qwik",
];

const BACKEND: &[&str] = &[
    "nodejs", "express", "fastify", "koa", "nestjs", "hapi", "django", "flask", "fastapi",
    "rails", "sinatra", "spring", "laravel", "symfony", "aspnet", "gin", "echo", "fiber",
    "actix", "axum", "phoenix",
];

const FULLSTACK: &[&str] = &["nextjs", "nuxt", "sveltekit", "remix", "meteor", "redwood"];

const STATIC_SITE: &[&str] = &["gatsby", "hugo", "jekyll", "eleventy", "astro", "docusaurus"];

/// Framework family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkFamily {
    Frontend,
    Backend,
    Fullstack,
    /// Static site generators
    Static,
    /// Plain HTML/CSS, no framework
    None,
    Unknown,
}

impl fmt::Display for FrameworkFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameworkFamily::Frontend => write!(f, "frontend"),
            FrameworkFamily::Backend => write!(f, "backend"),
            FrameworkFamily::Fullstack => write!(f, "fullstack"),
            FrameworkFamily::Static => write!(f, "static"),
            FrameworkFamily::None => write!(f, "none"),
            FrameworkFamily::Unknown => write!(f, "unknown"),
        }
    }
}

/// Look up the family of a framework id
pub fn family_of(framework: &str) -> FrameworkFamily {
    let id = framework.trim().to_lowercase();
    let id = id.as_str();

    if FRONTEND.contains(&id) {
        FrameworkFamily::Frontend
    } else if BACKEND.contains(&id) {
        FrameworkFamily::Backend
    } else if FULLSTACK.contains(&id) {
        FrameworkFamily::Fullstack
    } else if STATIC_SITE.contains(&id) {
        FrameworkFamily::Static
    } else if id == "none" {
        FrameworkFamily::None
    } else {
        FrameworkFamily::Unknown
    }
}

/// Default framework implied by a confidently detected app type
pub fn default_framework_for(app_type: AppType) -> &'static str {
    match app_type {
        AppType::Spa => "react",
        AppType::Api => "nodejs",
        AppType::Static => "none",
        _ => "react",
    }
}

/// Default app type implied by a confidently detected framework
pub fn default_app_type_for(framework: &str) -> AppType {
    match family_of(framework) {
        FrameworkFamily::Frontend => AppType::Spa,
        FrameworkFamily::Backend => AppType::Api,
        _ => AppType::Spa,
    }
}
