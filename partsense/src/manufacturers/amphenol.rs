//! Amphenol connectors
//!
//! Two ordering formats:
//! - `504182-0210`: six-digit series, then a four-digit code whose first two
//!   digits are the position count and whose last two select plating
//! - `10118194-0001LF`: eight-digit series starting with `10`, then a
//!   configuration code
//!
//! A trailing `LF` (lead-free) never affects compatibility.

use crate::category::ComponentCategory;
use crate::core::PartSenseError;
use crate::identifier::PartIdentifier;
use crate::manufacturers::delegate_to_base;
use crate::provider::{CompatibilityAttributes, Provider, ProviderBase};

#[derive(Debug, Clone)]
pub struct Amphenol {
    base: ProviderBase,
}

impl Amphenol {
    pub const ID: &'static str = "Amphenol";

    pub fn new() -> Result<Self, PartSenseError> {
        let base = ProviderBase::new(Self::ID, "Board-to-board and wire-to-board connectors")
            .rule(
                ComponentCategory::Connector,
                r"^(?P<series>\d{6})-(?P<package>(?P<pins>\d{2})\d{2})(?:LF)?$",
            )?
            .rule(
                ComponentCategory::Connector,
                r"^(?P<series>10\d{6})-(?P<package>\d{4})(?:LF)?$",
            )?;
        Ok(Self { base })
    }
}

impl Provider for Amphenol {
    delegate_to_base!();

    fn compatibility_attributes(&self, id: &PartIdentifier) -> Option<CompatibilityAttributes> {
        let m = self.claim(id)?;
        let attrs = CompatibilityAttributes::from_match(&m, id);
        Some(match m.get("pins") {
            Some(pins) => attrs.with_fixed("pins", pins),
            None => {
                let configuration = attrs.package.clone();
                attrs.with_fixed("configuration", configuration)
            }
        })
    }
}
