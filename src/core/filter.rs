use crate::utils::{Result, SassModulesError};
use glob::{MatchOptions, Pattern};

pub const DEFAULT_INCLUDE: [&str; 2] = ["**/*.scss", "**/*.sass"];

/// Include/exclude glob filter over module ids
#[derive(Debug, Clone)]
pub struct ModuleFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl ModuleFilter {
    /// An empty include list falls back to [`DEFAULT_INCLUDE`]
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        let include = if include.is_empty() {
            DEFAULT_INCLUDE.iter().map(|p| compile(p)).collect::<Result<Vec<_>>>()?
        } else {
            include.iter().map(|p| compile(p)).collect::<Result<Vec<_>>>()?
        };
        let exclude = exclude.iter().map(|p| compile(p)).collect::<Result<Vec<_>>>()?;

        Ok(Self { include, exclude })
    }

    pub fn matches(&self, id: &str) -> bool {
        // Virtual modules from other plugins are never stylesheets on disk
        if id.starts_with('\0') {
            return false;
        }

        let options = MatchOptions::new();
        if self.exclude.iter().any(|p| p.matches_with(id, options)) {
            return false;
        }
        self.include.iter().any(|p| p.matches_with(id, options))
    }
}

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|source| SassModulesError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
