//! Provider backed by a [`RuleTable`].

use std::collections::{BTreeMap, BTreeSet};

use crate::category::ComponentCategory;
use crate::core::PartSenseError;
use crate::identifier::PartIdentifier;
use crate::provider::{CompatibilityAttributes, Provider, ProviderBase, ProviderId};
use crate::rule::Rule;
use crate::tables::schema::RuleTable;

#[derive(Debug, Clone)]
pub struct TableProvider {
    base: ProviderBase,
    families: BTreeMap<String, String>,
    ratings: BTreeMap<String, f64>,
    fixed: Vec<String>,
    package_is_fixed: bool,
}

impl TableProvider {
    /// Compile a table. Every rule's category must be declared by the table.
    pub fn from_table(table: RuleTable) -> Result<Self, PartSenseError> {
        if table.provider.trim().is_empty() {
            return Err(PartSenseError::Table("provider id is empty".to_string()));
        }

        let mut base = ProviderBase::new(table.provider.clone(), table.description);
        for category in &table.categories {
            base = base.declare(*category);
        }
        for rule in &table.rules {
            if !table.categories.contains(&rule.category) {
                return Err(PartSenseError::UndeclaredCategory {
                    provider: table.provider,
                    category: rule.category,
                });
            }
            base = match rule.specificity {
                Some(specificity) => {
                    base.rule_with_specificity(rule.category, &rule.pattern, specificity)?
                }
                None => base.rule(rule.category, &rule.pattern)?,
            };
        }

        Ok(Self {
            base,
            families: table.families,
            ratings: table.ratings,
            fixed: table.fixed,
            package_is_fixed: table.package_is_fixed,
        })
    }
}

impl Provider for TableProvider {
    fn id(&self) -> &ProviderId {
        self.base.id()
    }

    fn description(&self) -> &str {
        self.base.description()
    }

    fn supported_categories(&self) -> &BTreeSet<ComponentCategory> {
        self.base.categories()
    }

    fn rules(&self) -> &[Rule] {
        self.base.rules()
    }

    fn compatibility_attributes(&self, id: &PartIdentifier) -> Option<CompatibilityAttributes> {
        let m = self.claim(id)?;
        let mut attrs = CompatibilityAttributes::from_match(&m, id)
            .with_attributes(&self.extract_attributes(id));

        if let Some(family) = self.families.get(&attrs.series) {
            attrs.family = family.clone();
        }
        if let Some(rating) = m.get("rating").and_then(|code| self.ratings.get(code)) {
            attrs.rating = Some(*rating);
        }
        for name in &self.fixed {
            attrs = attrs.with_fixed(name.as_str(), m.get(name).unwrap_or_default());
        }
        if self.package_is_fixed {
            let package = attrs.package.clone();
            attrs = attrs.with_fixed("package", package);
        }
        Some(attrs)
    }
}
