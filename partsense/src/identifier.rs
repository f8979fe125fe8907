//! Part identifiers
//!
//! A raw MPN string paired with its normalized form. Normalization happens
//! once here so that rules and providers only ever see upper-case, trimmed
//! text.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PartIdentifier {
    raw: String,
    normalized: String,
}

impl PartIdentifier {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized = raw.trim().to_uppercase();
        Self { raw, normalized }
    }

    /// The string exactly as supplied by the caller.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Trimmed, upper-cased form used for all matching.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

impl From<&str> for PartIdentifier {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for PartIdentifier {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for PartIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}
