//! Resolver
//!
//! Turns a raw MPN into a [`ClassificationResult`] by collecting every rule
//! that matches it, confirming each with the owning provider and ranking the
//! survivors:
//!
//! 1. higher specificity
//! 2. manufacturer-qualified category over generic
//! 3. earlier provider registration
//! 4. earlier rule in scan order (categories in vocabulary order, then rule
//!    order within the category)
//!
//! The resolver never fails on input. Misbehaving providers (panics,
//! claims outside their declared categories) are logged and skipped.

use parking_lot::RwLock;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::category::ComponentCategory;
use crate::core::{EngineOptions, PartSenseError};
use crate::identifier::PartIdentifier;
use crate::provider::compat::{self, Mismatch, Replacement};
use crate::provider::{PartAttributes, Provider, ProviderId, ProviderRegistry};
use crate::rule::Specificity;
use crate::store::PatternStore;

/// The winning classification of one MPN.
///
/// `category` and `specificity` come from the winning rule. `series`,
/// `package_code` and `attributes` come from the winning provider's
/// extractors, which read the provider's own best rule for the MPN
/// whatever the target category was.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub category: ComponentCategory,
    pub provider: ProviderId,
    pub series: String,
    pub package_code: String,
    pub specificity: Specificity,
    pub normalized: String,
    pub attributes: PartAttributes,
}

/// A confirmed rule match before the winner is picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub provider: ProviderId,
    pub category: ComponentCategory,
    pub specificity: Specificity,
    pub pattern: String,
    /// Provider registration rank
    pub rank: usize,
    #[serde(skip)]
    discovery: usize,
}

impl Candidate {
    fn sort_key(&self) -> (Reverse<Specificity>, bool, usize, usize) {
        (
            Reverse(self.specificity),
            !self.category.is_specialization(),
            self.rank,
            self.discovery,
        )
    }
}

/// Outcome of a replacement query routed through the winner for the
/// original MPN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplacementCheck {
    pub original: String,
    pub candidate: String,
    /// Provider that adjudicated; `None` when the original is unclassified.
    pub provider: Option<ProviderId>,
    #[serde(flatten)]
    pub verdict: Replacement,
}

impl ReplacementCheck {
    pub fn is_compatible(&self) -> bool {
        self.verdict.is_compatible()
    }
}

pub struct Resolver {
    store: Arc<PatternStore>,
    providers: ProviderRegistry,
}

impl Resolver {
    /// Pair a frozen store with the providers that populated it. Every
    /// provider registered in the store must be in `providers`.
    pub fn new(store: Arc<PatternStore>, providers: ProviderRegistry) -> Result<Self, PartSenseError> {
        for registration in store.registrations() {
            if !providers.contains(registration.provider.as_str()) {
                return Err(PartSenseError::UnknownProvider(
                    registration.provider.to_string(),
                ));
            }
        }
        Ok(Self { store, providers })
    }

    /// Build the store from `providers` and wrap both.
    pub fn from_registry(providers: ProviderRegistry) -> Result<Self, PartSenseError> {
        let store = Arc::new(providers.build_store()?);
        Self::new(store, providers)
    }

    pub fn builtin() -> Result<Self, PartSenseError> {
        Self::from_registry(ProviderRegistry::builtin()?)
    }

    pub fn from_options(options: &EngineOptions) -> Result<Self, PartSenseError> {
        Self::from_registry(ProviderRegistry::from_options(options)?)
    }

    pub fn store(&self) -> &Arc<PatternStore> {
        &self.store
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    pub fn provider(&self, id: &str) -> Option<&Arc<dyn Provider>> {
        self.providers.get(id)
    }

    /// Classify a raw MPN, optionally restricted to a target category and
    /// its refinements. `None` means no provider claims it.
    pub fn classify(&self, mpn: &str, target: Option<ComponentCategory>) -> Option<ClassificationResult> {
        self.classify_identifier(&PartIdentifier::new(mpn), target)
    }

    pub fn classify_identifier(
        &self,
        id: &PartIdentifier,
        target: Option<ComponentCategory>,
    ) -> Option<ClassificationResult> {
        for candidate in self.collect(id, target) {
            let Some(provider) = self.providers.get(candidate.provider.as_str()) else {
                continue;
            };
            let extracted = guarded(provider.as_ref(), "extraction", || {
                (
                    provider.extract_series(id),
                    provider.extract_package_code(id),
                    provider.extract_attributes(id),
                )
            });
            if let Some((series, package_code, attributes)) = extracted {
                return Some(ClassificationResult {
                    category: candidate.category,
                    provider: candidate.provider,
                    series,
                    package_code,
                    specificity: candidate.specificity,
                    normalized: id.normalized().to_string(),
                    attributes,
                });
            }
        }
        None
    }

    /// Every confirmed candidate, best first.
    pub fn candidates(&self, mpn: &str, target: Option<ComponentCategory>) -> Vec<Candidate> {
        self.collect(&PartIdentifier::new(mpn), target)
    }

    fn collect(&self, id: &PartIdentifier, target: Option<ComponentCategory>) -> Vec<Candidate> {
        if id.is_empty() {
            return Vec::new();
        }

        let categories: Vec<ComponentCategory> = match target {
            Some(target) => std::iter::once(target)
                .chain(target.specializations())
                .collect(),
            None => self.store.categories().collect(),
        };

        let mut confirmed: HashMap<(&str, ComponentCategory), bool> = HashMap::new();
        let mut candidates = Vec::new();
        let mut discovery = 0;

        for category in categories {
            for rule in self.store.rules_for(category) {
                if !rule.is_match(id) {
                    continue;
                }
                let Some(provider) = self.providers.get(rule.provider().as_str()) else {
                    continue;
                };
                let category = rule.category();
                let supported = provider.supported_categories();
                if !supported.contains(&category) {
                    tracing::warn!(
                        "Provider {} matched {} outside its declared categories",
                        provider.id(),
                        category
                    );
                    continue;
                }

                let mut confirm = |category: ComponentCategory| {
                    *confirmed
                        .entry((provider.id().as_str(), category))
                        .or_insert_with(|| {
                            guarded(provider.as_ref(), "matches", || provider.matches(id, category))
                                .unwrap_or(false)
                        })
                };
                if !confirm(category) {
                    continue;
                }
                if category.is_specialization() {
                    let generic = category.generic();
                    if !supported.contains(&generic) || !confirm(generic) {
                        tracing::warn!(
                            "Provider {} claimed {} for {} without the generic category {}",
                            provider.id(),
                            category,
                            id,
                            generic
                        );
                        continue;
                    }
                }

                candidates.push(Candidate {
                    provider: rule.provider().clone(),
                    category,
                    specificity: rule.specificity(),
                    pattern: rule.pattern().to_string(),
                    rank: self
                        .store
                        .provider_rank(rule.provider().as_str())
                        .unwrap_or(usize::MAX),
                    discovery,
                });
                discovery += 1;
            }
        }

        candidates.sort_by_key(Candidate::sort_key);
        candidates
    }

    /// Ask a specific provider whether `candidate` replaces `original`.
    /// Unknown providers answer `false`.
    pub fn is_official_replacement(&self, provider: &str, original: &str, candidate: &str) -> bool {
        let Some(p) = self.providers.get(provider) else {
            return false;
        };
        guarded(p.as_ref(), "is_official_replacement", || {
            p.is_official_replacement(original, candidate)
        })
        .unwrap_or(false)
    }

    /// Full verdict from a specific provider.
    pub fn evaluate_replacement(&self, provider: &str, original: &str, candidate: &str) -> Replacement {
        let outside = Replacement::Incompatible(Mismatch::OutsideDomain);
        let Some(p) = self.providers.get(provider) else {
            return outside;
        };
        guarded(p.as_ref(), "compatibility", || {
            compat::evaluate(p.as_ref(), original, candidate)
        })
        .unwrap_or(outside)
    }

    /// Route the replacement question to whichever provider wins the
    /// classification of `original`.
    pub fn replacement_via_winner(&self, original: &str, candidate: &str) -> ReplacementCheck {
        let winner = self.classify(original, None).map(|r| r.provider);
        let verdict = match &winner {
            Some(provider) => self.evaluate_replacement(provider.as_str(), original, candidate),
            None => Replacement::Incompatible(Mismatch::OutsideDomain),
        };
        ReplacementCheck {
            original: original.to_string(),
            candidate: candidate.to_string(),
            provider: winner,
            verdict,
        }
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("providers", &self.providers)
            .field("rules", &self.store.rule_count())
            .finish()
    }
}

/// Run a provider callback, turning a panic into `None`.
fn guarded<T>(provider: &dyn Provider, operation: &str, f: impl FnOnce() -> T) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Provider {} panicked during {}", provider.id(), operation);
            None
        }
    }
}

/// Shared, swappable reference to the current resolver.
///
/// Readers take a cheap `Arc` clone and keep using it even if the resolver
/// is swapped underneath them.
#[derive(Clone, Debug)]
pub struct ResolverHandle {
    inner: Arc<RwLock<Arc<Resolver>>>,
}

impl ResolverHandle {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(resolver))),
        }
    }

    pub fn current(&self) -> Arc<Resolver> {
        Arc::clone(&self.inner.read())
    }

    /// Install a new resolver and return the previous one.
    pub fn swap(&self, resolver: Resolver) -> Arc<Resolver> {
        std::mem::replace(&mut *self.inner.write(), Arc::new(resolver))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderBase;
    use crate::rule::Rule;
    use std::collections::BTreeSet;

    struct Simple(ProviderBase);

    impl Provider for Simple {
        fn id(&self) -> &ProviderId {
            self.0.id()
        }
        fn supported_categories(&self) -> &BTreeSet<ComponentCategory> {
            self.0.categories()
        }
        fn rules(&self) -> &[Rule] {
            self.0.rules()
        }
    }

    struct Panicky(ProviderBase);

    impl Provider for Panicky {
        fn id(&self) -> &ProviderId {
            self.0.id()
        }
        fn supported_categories(&self) -> &BTreeSet<ComponentCategory> {
            self.0.categories()
        }
        fn rules(&self) -> &[Rule] {
            self.0.rules()
        }
        fn matches(&self, _id: &PartIdentifier, _category: ComponentCategory) -> bool {
            panic!("broken provider")
        }
    }

    struct PanicOnSeries(ProviderBase);

    impl Provider for PanicOnSeries {
        fn id(&self) -> &ProviderId {
            self.0.id()
        }
        fn supported_categories(&self) -> &BTreeSet<ComponentCategory> {
            self.0.categories()
        }
        fn rules(&self) -> &[Rule] {
            self.0.rules()
        }
        fn extract_series(&self, _id: &PartIdentifier) -> String {
            panic!("broken extractor")
        }
    }

    struct PanicOnCompare(ProviderBase);

    impl Provider for PanicOnCompare {
        fn id(&self) -> &ProviderId {
            self.0.id()
        }
        fn supported_categories(&self) -> &BTreeSet<ComponentCategory> {
            self.0.categories()
        }
        fn rules(&self) -> &[Rule] {
            self.0.rules()
        }
        fn compatibility_attributes(
            &self,
            _id: &PartIdentifier,
        ) -> Option<compat::CompatibilityAttributes> {
            panic!("broken comparison")
        }
    }

    fn simple(id: &str, rules: &[(ComponentCategory, &str)]) -> Arc<dyn Provider> {
        let mut base = ProviderBase::new(id, "");
        for (category, pattern) in rules {
            base = base.rule(*category, pattern).unwrap();
        }
        Arc::new(Simple(base))
    }

    fn resolver(providers: Vec<Arc<dyn Provider>>) -> Resolver {
        let mut registry = ProviderRegistry::new();
        for p in providers {
            registry.register(p).unwrap();
        }
        Resolver::from_registry(registry).unwrap()
    }

    #[test]
    fn test_empty_input_is_no_match() {
        let r = resolver(vec![simple("A", &[(ComponentCategory::Ic, ".*")])]);
        assert!(r.classify("", None).is_none());
        assert!(r.classify("   ", None).is_none());
        assert!(r.candidates("", None).is_empty());
    }

    #[test]
    fn test_specificity_wins_regardless_of_registration_order() {
        let broad = || simple("Broad", &[(ComponentCategory::Ic, "^ST")]);
        let narrow = || simple("Narrow", &[(ComponentCategory::Microcontroller, r"^STM32F\d{3}")]);

        for providers in [vec![broad(), narrow()], vec![narrow(), broad()]] {
            let r = resolver(providers);
            let result = r.classify("STM32F103C8T6", None).unwrap();
            assert_eq!(result.provider.as_str(), "Narrow");
            assert_eq!(result.category, ComponentCategory::Microcontroller);
        }
    }

    #[test]
    fn test_equal_specificity_falls_back_to_registration_order() {
        let r = resolver(vec![
            simple("First", &[(ComponentCategory::Ic, "^ST")]),
            simple("Second", &[(ComponentCategory::Ic, "^ST")]),
        ]);
        assert_eq!(r.classify("ST1", None).unwrap().provider.as_str(), "First");
    }

    #[test]
    fn test_qualified_category_beats_generic_on_tie() {
        let r = resolver(vec![
            simple("Generic", &[(ComponentCategory::Mosfet, "^2N7002")]),
            simple("Qualified", &[(ComponentCategory::MosfetNxp, "^2N7002")]),
        ]);
        let result = r.classify("2N7002", Some(ComponentCategory::Mosfet)).unwrap();
        assert_eq!(result.provider.as_str(), "Qualified");
        assert_eq!(result.category, ComponentCategory::MosfetNxp);
    }

    #[test]
    fn test_target_category_restricts_candidates() {
        let r = resolver(vec![simple(
            "TI",
            &[
                (ComponentCategory::Opamp, "^LM358$"),
                (ComponentCategory::TemperatureSensor, "^LM35"),
            ],
        )]);
        assert_eq!(r.classify("LM358", None).unwrap().category, ComponentCategory::Opamp);
        assert_eq!(
            r.classify("LM358", Some(ComponentCategory::TemperatureSensor))
                .unwrap()
                .category,
            ComponentCategory::TemperatureSensor
        );
        assert!(r.classify("LM358", Some(ComponentCategory::Crystal)).is_none());
    }

    #[test]
    fn test_panicking_provider_is_contained() {
        let broken: Arc<dyn Provider> = Arc::new(Panicky(
            ProviderBase::new("Broken", "")
                .rule_with_specificity(ComponentCategory::Ic, "^NE555", Specificity(1000))
                .unwrap(),
        ));
        let r = resolver(vec![broken, simple("TI", &[(ComponentCategory::Ic, "^NE555")])]);
        let result = r.classify("NE555P", None).unwrap();
        assert_eq!(result.provider.as_str(), "TI");
    }

    #[test]
    fn test_panicking_extractor_falls_through_to_next_candidate() {
        let broken: Arc<dyn Provider> = Arc::new(PanicOnSeries(
            ProviderBase::new("Broken", "")
                .rule_with_specificity(ComponentCategory::Ic, "^NE555", Specificity(1000))
                .unwrap(),
        ));
        let r = resolver(vec![
            broken,
            simple("TI", &[(ComponentCategory::Ic, r"^(?P<series>NE555)(?P<package>[A-Z]*)$")]),
        ]);

        assert_eq!(r.candidates("NE555P", None)[0].provider.as_str(), "Broken");
        let result = r.classify("NE555P", None).unwrap();
        assert_eq!(result.provider.as_str(), "TI");
        assert_eq!(result.series, "NE555");
        assert_eq!(result.package_code, "P");
    }

    #[test]
    fn test_panicking_comparison_is_not_a_replacement() {
        let broken: Arc<dyn Provider> = Arc::new(PanicOnCompare(
            ProviderBase::new("Broken", "")
                .rule(ComponentCategory::Ic, r"^(?P<series>NE555)(?P<package>[A-Z]*)$")
                .unwrap(),
        ));
        let r = resolver(vec![broken]);

        assert_eq!(r.classify("NE555P", None).unwrap().provider.as_str(), "Broken");
        assert!(!r.is_official_replacement("Broken", "NE555P", "NE555D"));
        assert_eq!(
            r.evaluate_replacement("Broken", "NE555P", "NE555D"),
            Replacement::Incompatible(Mismatch::OutsideDomain)
        );
        assert_eq!(
            r.replacement_via_winner("NE555P", "NE555D").verdict,
            Replacement::Incompatible(Mismatch::OutsideDomain)
        );
        assert_eq!(r.evaluate_replacement("Broken", "NE555P", "NE555P"), Replacement::Identical);
    }

    #[test]
    fn test_extraction_ignores_target_category() {
        let r = resolver(vec![simple(
            "TI",
            &[
                (ComponentCategory::Opamp, r"^(?P<series>LM358)(?P<package>[A-Z]*)$"),
                (ComponentCategory::TemperatureSensor, r"^(?P<series>LM3[45])(?P<package>[A-Z0-9]*)"),
            ],
        )]);
        let result = r
            .classify("LM358", Some(ComponentCategory::TemperatureSensor))
            .unwrap();
        assert_eq!(result.category, ComponentCategory::TemperatureSensor);
        assert_eq!(result.series, "LM358");
        assert_eq!(result.package_code, "");
    }

    #[test]
    fn test_unknown_provider_in_store_is_rejected() {
        let registry = ProviderRegistry::new()
            .with(simple("A", &[(ComponentCategory::Ic, "^A")]))
            .unwrap();
        let store = Arc::new(registry.build_store().unwrap());
        let err = Resolver::new(store, ProviderRegistry::new()).unwrap_err();
        assert!(matches!(err, PartSenseError::UnknownProvider(id) if id == "A"));
    }

    #[test]
    fn test_candidates_are_ranked() {
        let r = resolver(vec![simple(
            "TI",
            &[
                (ComponentCategory::TemperatureSensor, "^LM35"),
                (ComponentCategory::Opamp, "^LM358$"),
            ],
        )]);
        let candidates = r.candidates("lm358", None);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].category, ComponentCategory::Opamp);
        assert!(candidates[0].specificity > candidates[1].specificity);
    }

    #[test]
    fn test_unknown_provider_replacement_is_false() {
        let r = resolver(vec![simple("A", &[(ComponentCategory::Ic, "^A")])]);
        assert!(!r.is_official_replacement("Nobody", "A1", "A1"));
        assert_eq!(
            r.evaluate_replacement("Nobody", "A1", "A1"),
            Replacement::Incompatible(Mismatch::OutsideDomain)
        );
    }

    #[test]
    fn test_handle_swap_keeps_old_readers() {
        let handle = ResolverHandle::new(resolver(vec![simple("A", &[(ComponentCategory::Ic, "^A")])]));
        let before = handle.current();
        let old = handle.swap(resolver(vec![simple("B", &[(ComponentCategory::Ic, "^B")])]));

        assert!(Arc::ptr_eq(&before, &old));
        assert!(before.classify("A1", None).is_some());
        assert!(handle.current().classify("A1", None).is_none());
        assert!(handle.current().classify("B1", None).is_some());
    }
}
