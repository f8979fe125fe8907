//! Embedded and external rule tables
//!
//! Tables come from:
//! 1. JSON files in user-supplied directories (no recompilation needed)
//! 2. JSON files compiled into the binary

use std::path::Path;

use crate::core::PartSenseError;
use crate::provider::Provider;
use crate::tables::provider::TableProvider;
use crate::tables::schema::RuleTable;

const EMBEDDED_ABRACON: &str = include_str!("../../tables/abracon.json");
const EMBEDDED_ONSEMI: &str = include_str!("../../tables/onsemi.json");

/// Tables compiled into the binary.
pub fn embedded_tables() -> Result<Vec<RuleTable>, PartSenseError> {
    [EMBEDDED_ABRACON, EMBEDDED_ONSEMI]
        .into_iter()
        .map(|json| serde_json::from_str(json).map_err(PartSenseError::from))
        .collect()
}

pub fn embedded_providers() -> Result<Vec<TableProvider>, PartSenseError> {
    embedded_tables()?
        .into_iter()
        .map(TableProvider::from_table)
        .collect()
}

/// Load every `*.json` table in `dir`, in file-name order.
/// Returns the providers that compiled and a message per file that did not.
pub fn load_directory(dir: &Path) -> (Vec<TableProvider>, Vec<String>) {
    let mut providers = Vec::new();
    let mut errors = Vec::new();

    if !dir.is_dir() {
        let message = format!("Rule table directory {:?} does not exist", dir);
        tracing::warn!("{}", message);
        errors.push(message);
        return (providers, errors);
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            errors.push(format!("Failed to read directory {:?}: {}", dir, e));
            return (providers, errors);
        }
    };

    let mut paths: Vec<_> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    for path in paths {
        match load_table_file(&path).and_then(TableProvider::from_table) {
            Ok(provider) => {
                if providers.iter().any(|p| p.id() == provider.id()) {
                    let message = format!(
                        "Skipping {:?}: provider {} already defined in this directory",
                        path.file_name(),
                        provider.id()
                    );
                    tracing::warn!("{}", message);
                    errors.push(message);
                    continue;
                }
                tracing::info!(
                    "Loaded rule table {} from {:?}",
                    provider.id(),
                    path.file_name()
                );
                providers.push(provider);
            }
            Err(e) => {
                let message = format!("Failed to load {:?}: {}", path.file_name(), e);
                tracing::warn!("{}", message);
                errors.push(message);
            }
        }
    }

    (providers, errors)
}

pub fn load_table_file(path: &Path) -> Result<RuleTable, PartSenseError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
