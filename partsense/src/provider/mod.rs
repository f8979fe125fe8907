//! Provider Trait
//!
//! Defines the common interface every manufacturer (or manufacturer family)
//! implements: rule registration, matching, attribute extraction and the
//! replacement-compatibility predicate.
//!
//! Most of the behavior is data-driven. A provider only has to hand over its
//! identity, its categories and its rules; the default methods read the
//! named captures of the best matching rule (see [`crate::rule`]) and run the
//! shared comparison in [`compat`]. Providers override the extractors when a
//! code needs decoding (e.g. a flash-size letter) and
//! [`Provider::compatibility_attributes`] when parts group into families.

pub mod base;
pub mod compat;
pub mod registry;

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

use crate::category::ComponentCategory;
use crate::core::PartSenseError;
use crate::identifier::PartIdentifier;
use crate::rule::{best_match, Rule, RuleMatch};
use crate::store::PatternStoreBuilder;

pub use base::ProviderBase;
pub use compat::{CompatibilityAttributes, Mismatch, Replacement};
pub use registry::ProviderRegistry;

/// Stable identifier of a provider (e.g. "TI", "GigaDevice").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProviderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl Borrow<str> for ProviderId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operating temperature grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureGrade {
    /// 0 to 70 °C
    Commercial,
    /// -40 to 85 °C
    Industrial,
    /// -40 to 105 °C
    Extended,
    /// -40 to 125 °C
    Automotive,
    /// -55 to 125 °C
    Military,
}

impl TemperatureGrade {
    /// Operating range in °C
    pub fn range(self) -> (i32, i32) {
        match self {
            TemperatureGrade::Commercial => (0, 70),
            TemperatureGrade::Industrial => (-40, 85),
            TemperatureGrade::Extended => (-40, 105),
            TemperatureGrade::Automotive => (-40, 125),
            TemperatureGrade::Military => (-55, 125),
        }
    }

    /// Common single-letter ordering codes (C/I/E/A/M).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "C" => Some(TemperatureGrade::Commercial),
            "I" => Some(TemperatureGrade::Industrial),
            "E" => Some(TemperatureGrade::Extended),
            "A" => Some(TemperatureGrade::Automotive),
            "M" => Some(TemperatureGrade::Military),
            _ => None,
        }
    }
}

/// Auxiliary attributes decoded from an MPN. `None` means the provider has no
/// value for that attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density_mbit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash_size_kb: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_grade: Option<TemperatureGrade>,
}

impl PartAttributes {
    pub fn is_empty(&self) -> bool {
        *self == PartAttributes::default()
    }

    /// Attributes read directly from conventionally named captures.
    pub fn from_match(m: &RuleMatch<'_, '_>) -> Self {
        Self {
            density_mbit: m.get_number("density"),
            pin_count: m.get_number("pins"),
            flash_size_kb: m.get_number("flash"),
            temperature_grade: m.get("temp").and_then(TemperatureGrade::from_code),
        }
    }
}

/// Common trait for all manufacturer providers
pub trait Provider: Send + Sync {
    fn id(&self) -> &ProviderId;

    /// Short human-readable description
    fn description(&self) -> &str {
        ""
    }

    /// The fixed set of categories this provider can ever claim.
    fn supported_categories(&self) -> &BTreeSet<ComponentCategory>;

    fn rules(&self) -> &[Rule];

    /// Register this provider's rules into a store under construction.
    fn initialize(&self, store: &mut PatternStoreBuilder) -> Result<(), PartSenseError> {
        store.register(self.id(), self.supported_categories(), self.rules())
    }

    /// The provider's own best rule for `id`, across all of its categories.
    fn claim<'r, 'h>(&'r self, id: &'h PartIdentifier) -> Option<RuleMatch<'r, 'h>> {
        best_match(self.rules(), id)
    }

    /// True iff this provider claims `id` for `category`. A generic category
    /// is claimed whenever one of its refinements is.
    fn matches(&self, id: &PartIdentifier, category: ComponentCategory) -> bool {
        if id.is_empty() || !self.supported_categories().contains(&category) {
            return false;
        }
        self.rules()
            .iter()
            .filter(|r| r.category().falls_under(category))
            .any(|r| r.is_match(id))
    }

    fn extract_series(&self, id: &PartIdentifier) -> String {
        self.claim(id)
            .and_then(|m| m.get("series"))
            .map(str::to_string)
            .unwrap_or_default()
    }

    fn extract_package_code(&self, id: &PartIdentifier) -> String {
        self.claim(id)
            .and_then(|m| m.get("package"))
            .map(str::to_string)
            .unwrap_or_default()
    }

    fn extract_attributes(&self, id: &PartIdentifier) -> PartAttributes {
        self.claim(id)
            .map(|m| PartAttributes::from_match(&m))
            .unwrap_or_default()
    }

    /// Per-call record compared by the replacement check; `None` outside
    /// this provider's domain.
    fn compatibility_attributes(&self, id: &PartIdentifier) -> Option<CompatibilityAttributes> {
        let m = self.claim(id)?;
        Some(CompatibilityAttributes::from_match(&m, id).with_attributes(&self.extract_attributes(id)))
    }

    /// Whether `candidate` can substitute for `original` in a design.
    fn is_official_replacement(&self, original: &str, candidate: &str) -> bool {
        compat::evaluate(self, original, candidate).is_compatible()
    }
}
