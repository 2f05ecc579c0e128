//! Report configuration: output location, asset naming limits, redaction
//! patterns and the self-contained toggle.
//!
//! All inputs are validated up front; an invalid redaction regex is fatal at
//! construction time, long before the first lifecycle event arrives.

use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ReportError, Result};

pub(crate) const DEFAULT_MAX_ASSET_FILENAME_LENGTH: usize = 255;

lazy_static! {
    static ref ENV_VAR: Regex =
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
            .expect("static regex");
}

/// Settings consumed read-only by the report pipeline.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    report_path: PathBuf,
    max_asset_filename_length: usize,
    redact_patterns: Vec<Regex>,
    self_contained: bool,
}

impl ReportConfig {
    /// Configuration for a report at `path`. Environment variables and a
    /// leading `~` in the path are expanded.
    pub fn new(path: impl AsRef<str>) -> Self {
        Self {
            report_path: expand_path(path.as_ref()),
            max_asset_filename_length: DEFAULT_MAX_ASSET_FILENAME_LENGTH,
            redact_patterns: Vec::new(),
            self_contained: false,
        }
    }

    #[must_use]
    pub fn with_max_asset_filename_length(mut self, max: usize) -> Self {
        self.max_asset_filename_length = max;
        self
    }

    /// Compile and install the environment-redaction patterns.
    pub fn with_redact_patterns<I, S>(mut self, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let raw: Vec<String> = patterns.into_iter().map(|p| p.as_ref().to_string()).collect();
        self.redact_patterns = compile_redact_patterns(&raw)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_self_contained(mut self, self_contained: bool) -> Self {
        self.self_contained = self_contained;
        self
    }

    #[must_use]
    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    #[must_use]
    pub fn max_asset_filename_length(&self) -> usize {
        self.max_asset_filename_length
    }

    #[must_use]
    pub fn redact_patterns(&self) -> &[Regex] {
        &self.redact_patterns
    }

    #[must_use]
    pub fn self_contained(&self) -> bool {
        self.self_contained
    }
}

/// Compile redaction patterns, anchoring each at the start of the subject so
/// matching behaves like a prefix match rather than a substring search.
pub(crate) fn compile_redact_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(&format!("^(?:{})", pattern)).map_err(|source| {
                ReportError::InvalidRedactPattern {
                    pattern: pattern.clone(),
                    source,
                }
            })
        })
        .collect()
}

/// Expand `$VAR`/`${VAR}` from the process environment (unknown variables are
/// left untouched) and a leading `~` to the user's home directory.
pub(crate) fn expand_path(raw: &str) -> PathBuf {
    let expanded = ENV_VAR.replace_all(raw, |caps: &regex::Captures<'_>| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        std::env::var(name).unwrap_or_else(|_| caps[0].to_string())
    });

    if let Some(rest) = expanded.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if expanded.as_ref() == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }

    PathBuf::from(expanded.as_ref())
}
