//! NXP / Nexperia MOSFETs
//!
//! `PSMN1R0-30YLD`: R_DS(on) code (`1R0` = 1.0 mOhm), V_DS, package. A part
//! with the same R_DS(on) and package and a higher V_DS is a replacement.
//! `2N7002` variants differ only in package and packing (`,215`).

use crate::category::ComponentCategory;
use crate::core::PartSenseError;
use crate::identifier::PartIdentifier;
use crate::manufacturers::delegate_to_base;
use crate::provider::{CompatibilityAttributes, Provider, ProviderBase};

#[derive(Debug, Clone)]
pub struct Nxp {
    base: ProviderBase,
}

impl Nxp {
    pub const ID: &'static str = "NXP";

    pub fn new() -> Result<Self, PartSenseError> {
        let base = ProviderBase::new(Self::ID, "Power and small-signal MOSFETs")
            .rule(
                ComponentCategory::MosfetNxp,
                r"^(?P<series>PSMN(?P<rds>\d+R\d+)-(?P<vds>\d{2,3}))(?P<package>[A-Z]{2,3})(?:,\d{3})?$",
            )?
            .rule(
                ComponentCategory::MosfetNxp,
                r"^(?P<series>2N7002)(?P<package>[A-Z]{0,3})(?:,\d{3})?$",
            )?;
        Ok(Self { base })
    }
}

impl Provider for Nxp {
    delegate_to_base!();

    fn compatibility_attributes(&self, id: &PartIdentifier) -> Option<CompatibilityAttributes> {
        let m = self.claim(id)?;
        let attrs = CompatibilityAttributes::from_match(&m, id);

        let Some(rds) = m.get("rds") else {
            return Some(attrs);
        };
        let package = attrs.package.clone();
        let attrs = attrs
            .with_family(format!("PSMN{}", rds))
            .with_fixed("package", package);
        Some(match m.get("vds").and_then(|v| v.parse::<f64>().ok()) {
            Some(vds) => attrs.with_rating(vds),
            None => attrs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::compat::{evaluate, Mismatch, Replacement};

    fn nxp() -> Nxp {
        Nxp::new().unwrap()
    }

    #[test]
    fn test_psmn_decoding() {
        let p = nxp();
        let id = PartIdentifier::new("PSMN1R0-30YLD");
        assert!(p.matches(&id, ComponentCategory::MosfetNxp));
        assert!(p.matches(&id, ComponentCategory::Mosfet));
        assert_eq!(p.extract_series(&id), "PSMN1R0-30");
        assert_eq!(p.extract_package_code(&id), "YLD");
    }

    #[test]
    fn test_higher_vds_replaces_lower() {
        let p = nxp();
        assert_eq!(evaluate(&p, "PSMN1R0-30YLD", "PSMN1R0-40YLD"), Replacement::Upgrade);
        assert_eq!(
            evaluate(&p, "PSMN1R0-40YLD", "PSMN1R0-30YLD"),
            Replacement::Incompatible(Mismatch::RatingLower)
        );
        assert_eq!(
            evaluate(&p, "PSMN1R0-30YLD", "PSMN1R5-30YLD"),
            Replacement::Incompatible(Mismatch::FamilyDiffers)
        );
        assert_eq!(
            evaluate(&p, "PSMN1R0-30YLD", "PSMN1R0-30BL"),
            Replacement::Incompatible(Mismatch::FixedAttributeDiffers("package".into()))
        );
    }

    #[test]
    fn test_2n7002_packing_is_cosmetic() {
        let p = nxp();
        assert!(p.is_official_replacement("2N7002,215", "2N7002"));
        assert!(p.is_official_replacement("2N7002", "2N7002P"));
        assert!(!p.is_official_replacement("2N7002", "PSMN1R0-30YLD"));
    }
}
