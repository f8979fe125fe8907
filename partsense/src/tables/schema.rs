//! JSON schema for data-driven rule tables

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::category::ComponentCategory;
use crate::rule::Specificity;

/// One manufacturer described entirely by data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTable {
    pub provider: String,
    #[serde(default)]
    pub description: String,
    pub categories: Vec<ComponentCategory>,
    pub rules: Vec<TableRule>,
    /// Captured series -> equivalence family
    #[serde(default)]
    pub families: BTreeMap<String, String>,
    /// Captured `rating` code -> numeric rating
    #[serde(default)]
    pub ratings: BTreeMap<String, f64>,
    /// Captures that must be identical for a replacement
    #[serde(default)]
    pub fixed: Vec<String>,
    #[serde(default)]
    pub package_is_fixed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRule {
    pub category: ComponentCategory,
    pub pattern: String,
    #[serde(default)]
    pub specificity: Option<Specificity>,
}
