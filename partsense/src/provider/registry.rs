//! The closed, ordered list of providers an engine is built from.
//!
//! Order matters: it is the registration order into the pattern store and
//! therefore the last-resort tie-break between equally specific rules.

use std::sync::Arc;

use crate::core::{EngineOptions, PartSenseError};
use crate::manufacturers;
use crate::provider::Provider;
use crate::store::{PatternStore, PatternStoreBuilder};
use crate::tables;

#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn Provider>>,
    load_errors: Vec<String>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in manufacturers followed by the embedded rule tables.
    pub fn builtin() -> Result<Self, PartSenseError> {
        let mut registry = Self::new();
        for provider in manufacturers::all()? {
            registry.register(provider)?;
        }
        for provider in tables::embedded_providers()? {
            registry.register(Arc::new(provider))?;
        }
        Ok(registry)
    }

    /// Registry described by `options`.
    ///
    /// Tables from directories replace a provider with the same id in place
    /// (earlier directories win). Files that fail to load are logged and kept
    /// in [`ProviderRegistry::load_errors`].
    pub fn from_options(options: &EngineOptions) -> Result<Self, PartSenseError> {
        let mut registry = if options.include_builtin {
            Self::builtin()?
        } else {
            Self::new()
        };

        for dir in options.table_dirs.iter().rev() {
            let (providers, errors) = tables::load_directory(dir);
            registry.load_errors.extend(errors);
            for provider in providers {
                registry.upsert(Arc::new(provider));
            }
        }

        for id in &options.disabled_providers {
            if registry.remove(id).is_none() {
                tracing::warn!("Cannot disable unknown provider {}", id);
            }
        }

        tracing::debug!("Provider registry ready with {} providers", registry.len());
        Ok(registry)
    }

    /// Append a provider; ids must be unique.
    pub fn register(&mut self, provider: Arc<dyn Provider>) -> Result<(), PartSenseError> {
        if self.contains(provider.id().as_str()) {
            return Err(PartSenseError::DuplicateProvider(provider.id().to_string()));
        }
        self.providers.push(provider);
        Ok(())
    }

    pub fn with(mut self, provider: Arc<dyn Provider>) -> Result<Self, PartSenseError> {
        self.register(provider)?;
        Ok(self)
    }

    /// Replace the provider with the same id, keeping its position, or
    /// append when there is none.
    pub fn upsert(&mut self, provider: Arc<dyn Provider>) {
        match self
            .providers
            .iter_mut()
            .find(|p| p.id() == provider.id())
        {
            Some(slot) => {
                tracing::info!("Rule table overrides provider {}", provider.id());
                *slot = provider;
            }
            None => self.providers.push(provider),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Arc<dyn Provider>> {
        let index = self.providers.iter().position(|p| p.id().as_str() == id)?;
        Some(self.providers.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Provider>> {
        self.providers.iter().find(|p| p.id().as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Provider>> {
        self.providers.iter()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Rule-table files that could not be loaded.
    pub fn load_errors(&self) -> &[String] {
        &self.load_errors
    }

    /// Initialize every provider, in order, into a fresh store and freeze it.
    pub fn build_store(&self) -> Result<PatternStore, PartSenseError> {
        let mut builder = PatternStoreBuilder::new();
        for provider in &self.providers {
            provider.initialize(&mut builder)?;
        }
        let store = builder.freeze();
        tracing::debug!(
            "Pattern store frozen: {} providers, {} rules",
            store.registrations().len(),
            store.rule_count()
        );
        Ok(store)
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.id().as_str()).collect::<Vec<_>>(),
            )
            .field("load_errors", &self.load_errors)
            .finish()
    }
}
