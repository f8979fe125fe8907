//! Texas Instruments
//!
//! Op-amps, the legacy LM34/LM35 temperature sensors, linear regulators and
//! the 555 timer. A trailing `A` grade (tighter tolerance) outranks the plain
//! part; for the 555 the prefix sets the temperature range and a wider range
//! outranks a narrower one.
//!
//! The temperature-sensor rule is a bare `LM3[45]` prefix and also matches
//! op-amps such as `LM358`; the op-amp rule is more specific and wins.

use crate::category::ComponentCategory;
use crate::core::PartSenseError;
use crate::identifier::PartIdentifier;
use crate::manufacturers::delegate_to_base;
use crate::provider::{CompatibilityAttributes, PartAttributes, Provider, ProviderBase, TemperatureGrade};

#[derive(Debug, Clone)]
pub struct TexasInstruments {
    base: ProviderBase,
}

impl TexasInstruments {
    pub const ID: &'static str = "TI";

    pub fn new() -> Result<Self, PartSenseError> {
        let base = ProviderBase::new(Self::ID, "Texas Instruments analog and timers")
            .rule(
                ComponentCategory::Opamp,
                r"^(?P<series>LM(?:358|324|2904|2902|741))(?P<grade>A)?(?P<package>[A-Z]{0,3})$",
            )?
            .rule(
                ComponentCategory::TemperatureSensor,
                r"^(?P<series>LM3[45])(?P<package>[A-Z]*)",
            )?
            .rule(
                ComponentCategory::VoltageRegulator,
                r"^(?P<series>LM78(?:L|M)?\d{2})(?P<grade>A)?C?(?P<package>[A-Z]{0,3})$",
            )?
            .rule(
                ComponentCategory::VoltageRegulator,
                r"^(?P<series>LM317(?:L|M)?)(?P<package>[A-Z]{0,4})$",
            )?
            .rule(
                ComponentCategory::Ic,
                r"^(?P<series>(?P<grade>NE|SA|SE)555)(?P<package>[A-Z]{0,3})$",
            )?;
        Ok(Self { base })
    }
}

/// 555 prefix -> (temperature range, rank)
fn timer_grade(prefix: &str) -> Option<(TemperatureGrade, f64)> {
    match prefix {
        "NE" => Some((TemperatureGrade::Commercial, 0.0)),
        "SA" => Some((TemperatureGrade::Industrial, 1.0)),
        "SE" => Some((TemperatureGrade::Military, 2.0)),
        _ => None,
    }
}

impl Provider for TexasInstruments {
    delegate_to_base!();

    fn extract_attributes(&self, id: &PartIdentifier) -> PartAttributes {
        let Some(m) = self.claim(id) else {
            return PartAttributes::default();
        };
        let mut attrs = PartAttributes::from_match(&m);
        if m.category() == ComponentCategory::Ic {
            attrs.temperature_grade = m.get("grade").and_then(timer_grade).map(|(grade, _)| grade);
        }
        attrs
    }

    fn compatibility_attributes(&self, id: &PartIdentifier) -> Option<CompatibilityAttributes> {
        let m = self.claim(id)?;
        let attrs = CompatibilityAttributes::from_match(&m, id)
            .with_attributes(&self.extract_attributes(id));

        Some(match m.category() {
            ComponentCategory::Opamp | ComponentCategory::VoltageRegulator => {
                let rank = if m.get("grade").is_some() { 1.0 } else { 0.0 };
                attrs.with_rating(rank)
            }
            ComponentCategory::Ic => match m.get("grade").and_then(timer_grade) {
                Some((_, rank)) => attrs.with_family("555").with_rating(rank),
                None => attrs,
            },
            _ => attrs,
        })
    }
}
