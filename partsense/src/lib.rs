//! PartSense - manufacturer part number classification library
//!
//! This library decides which component category and manufacturer family a
//! raw MPN belongs to, extracts normalized attributes (series, package,
//! density, pin count, flash size, temperature grade) and judges whether one
//! MPN is an official replacement for another.
//!
//! # Quick Start
//!
//! ```no_run
//! use partsense::{ComponentCategory, Resolver};
//!
//! let resolver = Resolver::builtin().unwrap();
//!
//! if let Some(result) = resolver.classify("504182-0210", Some(ComponentCategory::Connector)) {
//!     println!("{} {} series={} package={}",
//!         result.provider, result.category, result.series, result.package_code);
//! }
//!
//! let check = resolver.replacement_via_winner("1N4001", "1N4007");
//! assert!(check.is_compatible());
//! ```
//!
//! # Features
//!
//! - **Overlapping rules**: many providers may claim the same prefix; the
//!   most specific pattern wins, deterministically
//! - **Provider extraction**: series, package code and decoded attributes
//! - **Replacement checks**: upgrade / cosmetic-equivalence verdicts
//! - **Rule tables**: JSON-described manufacturers, loadable at runtime

pub mod category;
pub mod core;
pub mod identifier;
pub mod manufacturers;
pub mod provider;
pub mod resolver;
pub mod rule;
pub mod store;
pub mod tables;

// Re-export main types
pub use crate::core::{
    classify_file, classify_lines, classify_mpns, BatchStats, EngineOptions, LineResult, PartSenseError,
};
pub use category::ComponentCategory;
pub use identifier::PartIdentifier;
pub use provider::{
    CompatibilityAttributes, Mismatch, PartAttributes, Provider, ProviderBase, ProviderId,
    ProviderRegistry, Replacement, TemperatureGrade,
};
pub use resolver::{Candidate, ClassificationResult, ReplacementCheck, Resolver, ResolverHandle};
pub use rule::{Rule, RuleMatch, Specificity};
pub use store::{PatternStore, PatternStoreBuilder};

/// Classify one MPN with the built-in providers (convenience wrapper).
///
/// Builds a fresh resolver on every call; keep a [`Resolver`] around when
/// classifying more than a handful of parts.
pub fn classify(
    mpn: &str,
    target: Option<ComponentCategory>,
) -> Result<Option<ClassificationResult>, PartSenseError> {
    Ok(Resolver::builtin()?.classify(mpn, target))
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        ClassificationResult, ComponentCategory, EngineOptions, PartIdentifier, PartSenseError,
        Provider, Replacement, Resolver, ResolverHandle,
    };
}
