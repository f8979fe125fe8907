//! Pattern Store
//!
//! The registry of every provider's rules, grouped by category in the order
//! providers registered them. It is built in two phases:
//!
//! ```text
//! PatternStoreBuilder ──register()──▶ ... ──freeze()──▶ PatternStore
//!      (open)                                            (read-only)
//! ```
//!
//! Only the builder can accept rules, so nothing can be added once a
//! [`PatternStore`] exists and classification has started. The frozen store
//! holds no interior mutability and can be shared across threads behind an
//! `Arc` without locking.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::category::ComponentCategory;
use crate::core::PartSenseError;
use crate::provider::ProviderId;
use crate::rule::Rule;

/// What one provider contributed to a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderRegistration {
    pub provider: ProviderId,
    pub categories: BTreeSet<ComponentCategory>,
    #[serde(skip)]
    pub rules: Vec<Rule>,
}

/// A store that still accepts registrations.
#[derive(Debug, Default)]
pub struct PatternStoreBuilder {
    registrations: Vec<ProviderRegistration>,
    by_category: HashMap<ComponentCategory, Vec<Rule>>,
}

impl PatternStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider's rules.
    ///
    /// Registering the same provider again with identical categories and
    /// rules is a no-op; registering it with anything else is an error.
    pub fn register(
        &mut self,
        provider: &ProviderId,
        categories: &BTreeSet<ComponentCategory>,
        rules: &[Rule],
    ) -> Result<(), PartSenseError> {
        if let Some(existing) = self.registrations.iter().find(|r| &r.provider == provider) {
            if &existing.categories == categories && existing.rules.as_slice() == rules {
                tracing::debug!("Provider {} already registered, skipping", provider);
                return Ok(());
            }
            return Err(PartSenseError::ConflictingRegistration(provider.to_string()));
        }

        for category in categories {
            let generic = category.generic();
            if !categories.contains(&generic) {
                return Err(PartSenseError::MissingGenericCategory {
                    provider: provider.to_string(),
                    category: *category,
                    generic,
                });
            }
        }

        for rule in rules {
            if rule.provider() != provider {
                return Err(PartSenseError::ForeignRule {
                    provider: provider.to_string(),
                    owner: rule.provider().to_string(),
                });
            }
            if !categories.contains(&rule.category()) {
                return Err(PartSenseError::UndeclaredCategory {
                    provider: provider.to_string(),
                    category: rule.category(),
                });
            }
        }

        for rule in rules {
            self.by_category
                .entry(rule.category())
                .or_default()
                .push(rule.clone());
        }
        self.registrations.push(ProviderRegistration {
            provider: provider.clone(),
            categories: categories.clone(),
            rules: rules.to_vec(),
        });

        tracing::debug!("Registered {} rules for provider {}", rules.len(), provider);
        Ok(())
    }

    /// Close the store for registration.
    pub fn freeze(self) -> PatternStore {
        let ranks = self
            .registrations
            .iter()
            .enumerate()
            .map(|(rank, r)| (r.provider.clone(), rank))
            .collect();

        PatternStore {
            registrations: self.registrations,
            by_category: self.by_category,
            ranks,
        }
    }
}

/// Frozen, read-only rule registry.
#[derive(Debug)]
pub struct PatternStore {
    registrations: Vec<ProviderRegistration>,
    by_category: HashMap<ComponentCategory, Vec<Rule>>,
    ranks: HashMap<ProviderId, usize>,
}

impl PatternStore {
    /// Rules registered for `category`, in registration order. Empty when
    /// nothing was registered for it.
    pub fn rules_for(&self, category: ComponentCategory) -> &[Rule] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Categories with at least one rule, in vocabulary order.
    pub fn categories(&self) -> impl Iterator<Item = ComponentCategory> + '_ {
        ComponentCategory::ALL
            .into_iter()
            .filter(|c| self.by_category.contains_key(c))
    }

    pub fn registrations(&self) -> &[ProviderRegistration] {
        &self.registrations
    }

    pub fn registration(&self, provider: &str) -> Option<&ProviderRegistration> {
        self.ranks
            .get(provider)
            .and_then(|rank| self.registrations.get(*rank))
    }

    /// Position of the provider in registration order.
    pub fn provider_rank(&self, provider: &str) -> Option<usize> {
        self.ranks.get(provider).copied()
    }

    pub fn contains_provider(&self, provider: &str) -> bool {
        self.ranks.contains_key(provider)
    }

    pub fn rule_count(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty()
    }
}
