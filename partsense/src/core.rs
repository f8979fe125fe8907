//! Core error type, engine options and file-level helpers shared by the
//! library and the CLI.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::category::ComponentCategory;
use crate::resolver::{ClassificationResult, Resolver};

/// Environment variable holding extra rule-table directories (platform path
/// list syntax, e.g. `a:b` on Unix).
pub const TABLES_ENV_VAR: &str = "PARTSENSE_TABLES";

/// Construction-time failures. Classification itself never fails; it
/// reports "no match" instead.
#[derive(Debug, thiserror::Error)]
pub enum PartSenseError {
    #[error("Invalid pattern {pattern:?} for provider {provider}: {message}")]
    InvalidPattern {
        provider: String,
        pattern: String,
        message: String,
    },
    #[error("Provider {provider} registered a rule for undeclared category {category}")]
    UndeclaredCategory {
        provider: String,
        category: ComponentCategory,
    },
    #[error("Provider {provider} declares {category} without its generic category {generic}")]
    MissingGenericCategory {
        provider: String,
        category: ComponentCategory,
        generic: ComponentCategory,
    },
    #[error("Rule owned by {owner} submitted under provider {provider}")]
    ForeignRule { provider: String, owner: String },
    #[error("Provider {0} re-registered with different rules")]
    ConflictingRegistration(String),
    #[error("Duplicate provider id: {0}")]
    DuplicateProvider(String),
    #[error("Pattern store references unknown provider: {0}")]
    UnknownProvider(String),
    #[error("Rule table error: {0}")]
    Table(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Options for building a resolver (CLI or library callers).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Built-in manufacturers and embedded rule tables
    pub include_builtin: bool,
    /// Extra rule-table directories, highest priority first
    pub table_dirs: Vec<PathBuf>,
    /// Provider ids to leave out
    pub disabled_providers: Vec<String>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            include_builtin: true,
            table_dirs: vec![],
            disabled_providers: vec![],
        }
    }
}

impl EngineOptions {
    /// Defaults plus any directories listed in `PARTSENSE_TABLES`.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Some(paths) = std::env::var_os(TABLES_ENV_VAR) {
            options
                .table_dirs
                .extend(std::env::split_paths(&paths).filter(|p| !p.as_os_str().is_empty()));
        }
        options
    }

    pub fn with_table_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.table_dirs.push(dir.into());
        self
    }

    pub fn without_provider(mut self, id: impl Into<String>) -> Self {
        self.disabled_providers.push(id.into());
        self
    }
}

/// Classification of one line of an MPN list.
#[derive(Debug, Clone, Serialize)]
pub struct LineResult {
    pub line: usize,
    pub mpn: String,
    pub result: Option<ClassificationResult>,
}

/// Summary counts over a batch of classifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
}

impl BatchStats {
    pub fn from_results(results: &[LineResult]) -> Self {
        let matched = results.iter().filter(|r| r.result.is_some()).count();
        Self {
            total: results.len(),
            matched,
            unmatched: results.len() - matched,
        }
    }
}

/// Classify every MPN in `text`, one per line. Blank lines and lines
/// starting with `#` are skipped; line numbers are 1-based.
pub fn classify_lines(
    resolver: &Resolver,
    text: &str,
    target: Option<ComponentCategory>,
) -> Vec<LineResult> {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let mpn = line.trim();
            if mpn.is_empty() || mpn.starts_with('#') {
                return None;
            }
            Some(LineResult {
                line: index + 1,
                mpn: mpn.to_string(),
                result: resolver.classify(mpn, target),
            })
        })
        .collect()
}

/// Classify MPNs given one by one, numbered from 1 in order. Every entry is
/// classified as given, comments and blanks included.
pub fn classify_mpns<S: AsRef<str>>(
    resolver: &Resolver,
    mpns: &[S],
    target: Option<ComponentCategory>,
) -> Vec<LineResult> {
    mpns.iter()
        .enumerate()
        .map(|(index, mpn)| LineResult {
            line: index + 1,
            mpn: mpn.as_ref().to_string(),
            result: resolver.classify(mpn.as_ref(), target),
        })
        .collect()
}

/// Read an MPN list file and classify each entry.
pub fn classify_file(
    resolver: &Resolver,
    path: &Path,
    target: Option<ComponentCategory>,
) -> Result<Vec<LineResult>, PartSenseError> {
    let text = std::fs::read_to_string(path)?;
    let results = classify_lines(resolver, &text, target);
    tracing::info!(
        "Classified {} part numbers from {}",
        results.len(),
        path.display()
    );
    Ok(results)
}
