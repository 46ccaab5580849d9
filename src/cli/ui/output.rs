use console::{StyledObject, style};

use crate::types::{ConfidenceLevel, ValidationIssue};

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Aligned `label: value` line
    pub fn field(&self, label: &str, value: impl std::fmt::Display) {
        println!("  {:<14} {}", style(format!("{}:", label)).dim(), value);
    }

    pub fn issue(&self, issue: &ValidationIssue) {
        if issue.kind.is_fatal() {
            self.error(&issue.to_string());
        } else {
            self.warning(&issue.to_string());
        }
    }

    /// Confidence tier rendered as a coloured badge
    pub fn badge(&self, level: ConfidenceLevel) -> StyledObject<String> {
        let label = format!("[{}]", level.to_string().to_uppercase());
        match level {
            ConfidenceLevel::Excellent => style(label).green().bold(),
            ConfidenceLevel::Good => style(label).green(),
            ConfidenceLevel::Fair => style(label).yellow(),
            ConfidenceLevel::Low => style(label).red(),
            ConfidenceLevel::Error => style(label).red().bold(),
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
