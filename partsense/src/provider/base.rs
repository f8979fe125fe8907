//! Identity, categories and rules shared by every provider implementation.

use std::collections::BTreeSet;

use crate::category::ComponentCategory;
use crate::core::PartSenseError;
use crate::provider::ProviderId;
use crate::rule::{Rule, Specificity};

#[derive(Debug, Clone)]
pub struct ProviderBase {
    id: ProviderId,
    description: String,
    categories: BTreeSet<ComponentCategory>,
    rules: Vec<Rule>,
}

impl ProviderBase {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: ProviderId::new(id),
            description: description.into(),
            categories: BTreeSet::new(),
            rules: Vec::new(),
        }
    }

    /// Add a rule. Its category, and the generic parent of a refinement, are
    /// declared as supported.
    pub fn rule(self, category: ComponentCategory, pattern: &str) -> Result<Self, PartSenseError> {
        let rule = Rule::new(&self.id, category, pattern)?;
        Ok(self.push(rule))
    }

    /// Add a rule with an explicit specificity.
    pub fn rule_with_specificity(
        self,
        category: ComponentCategory,
        pattern: &str,
        specificity: Specificity,
    ) -> Result<Self, PartSenseError> {
        let rule = Rule::new(&self.id, category, pattern)?.with_specificity(specificity);
        Ok(self.push(rule))
    }

    /// Declare a category (and its generic parent) without adding a rule.
    pub fn declare(mut self, category: ComponentCategory) -> Self {
        self.categories.insert(category);
        self.categories.insert(category.generic());
        self
    }

    fn push(mut self, rule: Rule) -> Self {
        self.categories.insert(rule.category());
        self.categories.insert(rule.category().generic());
        self.rules.push(rule);
        self
    }

    pub fn id(&self) -> &ProviderId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn categories(&self) -> &BTreeSet<ComponentCategory> {
        &self.categories
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}
