//! Replacement compatibility
//!
//! The ordered comparison every provider's `is_official_replacement` runs:
//!
//! 1. the same literal MPN is always a replacement for itself;
//! 2. same family with an ordering rating where the candidate's rating is at
//!    least the original's (a 1000 V rectifier replaces a 50 V one);
//! 3. same family differing only in cosmetic attributes (package, temperature
//!    grade, lead-free or packing suffix);
//! 4. anything else is incompatible.
//!
//! Providers differ only in how they fill [`CompatibilityAttributes`].

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::category::ComponentCategory;
use crate::identifier::PartIdentifier;
use crate::provider::{PartAttributes, Provider, TemperatureGrade};
use crate::rule::RuleMatch;

/// Attributes one provider derives from one MPN for comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibilityAttributes {
    pub category: ComponentCategory,
    /// Equivalence key; parts of different families never replace each other.
    pub family: String,
    pub series: String,
    /// Higher is better (voltage, current, density, grade rank).
    pub rating: Option<f64>,
    /// Attributes that must be equal (pin count, frequency, footprint).
    pub fixed: BTreeMap<String, String>,
    /// Cosmetic
    pub package: String,
    /// Cosmetic
    pub temperature_grade: Option<TemperatureGrade>,
}

impl CompatibilityAttributes {
    pub fn new(category: ComponentCategory, series: impl Into<String>) -> Self {
        let series = series.into();
        Self {
            category,
            family: series.clone(),
            series,
            rating: None,
            fixed: BTreeMap::new(),
            package: String::new(),
            temperature_grade: None,
        }
    }

    /// Defaults read from conventionally named captures: `series` (falls back
    /// to the whole MPN), `package` and a decimal `rating`.
    pub fn from_match(m: &RuleMatch<'_, '_>, id: &PartIdentifier) -> Self {
        let series = m.get("series").unwrap_or(id.normalized());
        let mut attrs = Self::new(m.category(), series)
            .with_package(m.get("package").unwrap_or_default());
        attrs.rating = m
            .get("rating")
            .and_then(|r| r.parse().ok())
            .filter(|r: &f64| r.is_finite());
        attrs
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_fixed(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fixed.insert(name.into(), value.into());
        self
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    pub fn with_attributes(mut self, attributes: &PartAttributes) -> Self {
        self.temperature_grade = attributes.temperature_grade;
        self
    }
}

/// Why two parts are not interchangeable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mismatch {
    /// At least one MPN is not claimed by the provider.
    OutsideDomain,
    CategoryDiffers,
    FamilyDiffers,
    FixedAttributeDiffers(String),
    /// The candidate's rating is below the original's.
    RatingLower,
    /// Only one side has a rating.
    RatingUnknown,
}

/// Outcome of the ordered comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
pub enum Replacement {
    Identical,
    Upgrade,
    Equivalent,
    Incompatible(Mismatch),
}

impl Replacement {
    pub fn is_compatible(&self) -> bool {
        !matches!(self, Replacement::Incompatible(_))
    }
}

impl fmt::Display for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Identical => f.write_str("identical part"),
            Replacement::Upgrade => f.write_str("compatible (higher rating)"),
            Replacement::Equivalent => f.write_str("compatible (cosmetic difference only)"),
            Replacement::Incompatible(reason) => match reason {
                Mismatch::OutsideDomain => f.write_str("incompatible: not claimed by this provider"),
                Mismatch::CategoryDiffers => f.write_str("incompatible: different categories"),
                Mismatch::FamilyDiffers => f.write_str("incompatible: different series"),
                Mismatch::FixedAttributeDiffers(name) => {
                    write!(f, "incompatible: {} differs", name)
                }
                Mismatch::RatingLower => f.write_str("incompatible: lower rating"),
                Mismatch::RatingUnknown => f.write_str("incompatible: rating not comparable"),
            },
        }
    }
}

/// Run the ordered comparison for `candidate` replacing `original`.
pub fn evaluate<P: Provider + ?Sized>(provider: &P, original: &str, candidate: &str) -> Replacement {
    let original = PartIdentifier::new(original);
    let candidate = PartIdentifier::new(candidate);
    if original.is_empty() || candidate.is_empty() {
        return Replacement::Incompatible(Mismatch::OutsideDomain);
    }
    if provider.claim(&original).is_none() || provider.claim(&candidate).is_none() {
        return Replacement::Incompatible(Mismatch::OutsideDomain);
    }
    if original.normalized() == candidate.normalized() {
        return Replacement::Identical;
    }

    match (
        provider.compatibility_attributes(&original),
        provider.compatibility_attributes(&candidate),
    ) {
        (Some(a), Some(b)) => compare(&a, &b),
        _ => Replacement::Incompatible(Mismatch::OutsideDomain),
    }
}

/// Tiers 2 to 4 of the comparison on already extracted attributes.
pub fn compare(original: &CompatibilityAttributes, candidate: &CompatibilityAttributes) -> Replacement {
    if original.category != candidate.category {
        return Replacement::Incompatible(Mismatch::CategoryDiffers);
    }
    if original.family != candidate.family {
        return Replacement::Incompatible(Mismatch::FamilyDiffers);
    }
    if let Some(name) = first_fixed_difference(&original.fixed, &candidate.fixed) {
        return Replacement::Incompatible(Mismatch::FixedAttributeDiffers(name));
    }

    let finite = |rating: Option<f64>| rating.filter(|r| r.is_finite());
    match (finite(original.rating), finite(candidate.rating)) {
        (Some(a), Some(b)) if b > a => Replacement::Upgrade,
        (Some(a), Some(b)) if b < a => Replacement::Incompatible(Mismatch::RatingLower),
        (Some(_), None) | (None, Some(_)) => Replacement::Incompatible(Mismatch::RatingUnknown),
        _ => Replacement::Equivalent,
    }
}

fn first_fixed_difference(
    a: &BTreeMap<String, String>,
    b: &BTreeMap<String, String>,
) -> Option<String> {
    a.keys()
        .chain(b.keys())
        .find(|key| a.get(*key) != b.get(*key))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(family: &str) -> CompatibilityAttributes {
        CompatibilityAttributes::new(ComponentCategory::Diode, family)
    }

    #[test]
    fn test_rating_upgrade_is_one_way() {
        let low = attrs("1N400X").with_rating(50.0);
        let high = attrs("1N400X").with_rating(1000.0);
        assert_eq!(compare(&low, &high), Replacement::Upgrade);
        assert_eq!(
            compare(&high, &low),
            Replacement::Incompatible(Mismatch::RatingLower)
        );
    }

    #[test]
    fn test_cosmetic_difference_is_equivalent() {
        let a = attrs("LM358").with_package("N");
        let b = attrs("LM358").with_package("DR");
        assert_eq!(compare(&a, &b), Replacement::Equivalent);
        assert_eq!(compare(&b, &a), Replacement::Equivalent);
    }

    #[test]
    fn test_family_and_category_must_match() {
        assert_eq!(
            compare(&attrs("LM358"), &attrs("LM324")),
            Replacement::Incompatible(Mismatch::FamilyDiffers)
        );
        let other = CompatibilityAttributes::new(ComponentCategory::Opamp, "LM358");
        assert_eq!(
            compare(&attrs("LM358"), &other),
            Replacement::Incompatible(Mismatch::CategoryDiffers)
        );
    }

    #[test]
    fn test_fixed_attributes_must_match() {
        let two = attrs("504182").with_fixed("pins", "2");
        let four = attrs("504182").with_fixed("pins", "4");
        let bare = attrs("504182");
        assert_eq!(
            compare(&two, &four),
            Replacement::Incompatible(Mismatch::FixedAttributeDiffers("pins".into()))
        );
        assert_eq!(
            compare(&bare, &two),
            Replacement::Incompatible(Mismatch::FixedAttributeDiffers("pins".into()))
        );
    }

    #[test]
    fn test_one_sided_rating_is_not_comparable() {
        let rated = attrs("X").with_rating(1.0);
        assert_eq!(
            compare(&attrs("X"), &rated),
            Replacement::Incompatible(Mismatch::RatingUnknown)
        );
    }

    #[test]
    fn test_non_finite_rating_is_not_comparable() {
        let rated = attrs("X").with_rating(1.0);
        let nan = attrs("X").with_rating(f64::NAN);
        let inf = attrs("X").with_rating(f64::INFINITY);
        assert_eq!(
            compare(&rated, &nan),
            Replacement::Incompatible(Mismatch::RatingUnknown)
        );
        assert_eq!(
            compare(&rated, &inf),
            Replacement::Incompatible(Mismatch::RatingUnknown)
        );
    }

    #[test]
    fn test_rating_capture_rejects_nan_text() {
        let rule = crate::rule::Rule::new(
            &crate::provider::ProviderId::from("X"),
            ComponentCategory::Diode,
            r"^(?P<series>D)(?P<rating>[A-Z0-9]+)$",
        )
        .unwrap();
        for mpn in ["DNAN", "DINF", "DINFINITY"] {
            let id = PartIdentifier::new(mpn);
            let m = rule.captures(&id).unwrap();
            assert_eq!(CompatibilityAttributes::from_match(&m, &id).rating, None, "{}", mpn);
        }
        let id = PartIdentifier::new("D50");
        let m = rule.captures(&id).unwrap();
        assert_eq!(CompatibilityAttributes::from_match(&m, &id).rating, Some(50.0));
    }

    #[test]
    fn test_verdict_serialization() {
        let json = serde_json::to_value(Replacement::Upgrade).unwrap();
        assert_eq!(json, serde_json::json!({ "verdict": "upgrade" }));
        let json = serde_json::to_value(Replacement::Incompatible(Mismatch::FamilyDiffers)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "verdict": "incompatible", "reason": "family_differs" })
        );
    }
}
