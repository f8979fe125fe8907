//! Vishay discrete diodes
//!
//! - `1N4001`..`1N4007` rectifiers, the last digit sets the reverse voltage
//! - `1N5817`..`1N5819` Schottky rectifiers
//! - `1N4148` / `1N914` small-signal diodes (one family)
//! - any other `1Nxxx(x)` JEDEC number as a generic diode
//!
//! Suffixes such as `-E3/54` or `GP` are packing and finish codes.

use crate::category::ComponentCategory;
use crate::core::PartSenseError;
use crate::identifier::PartIdentifier;
use crate::manufacturers::delegate_to_base;
use crate::provider::{CompatibilityAttributes, Provider, ProviderBase};

const SUFFIX: &str = r"(?P<package>(?:[-/][A-Z0-9]+|[A-Z]{1,2})*)";

#[derive(Debug, Clone)]
pub struct Vishay {
    base: ProviderBase,
}

impl Vishay {
    pub const ID: &'static str = "Vishay";

    pub fn new() -> Result<Self, PartSenseError> {
        let base = ProviderBase::new(Self::ID, "Rectifier, Schottky and signal diodes")
            .rule(
                ComponentCategory::DiodeRectifier,
                &format!(r"^(?P<series>1N400(?P<code>[1-7])){}$", SUFFIX),
            )?
            .rule(
                ComponentCategory::DiodeSchottky,
                &format!(r"^(?P<series>1N581(?P<code>[7-9])){}$", SUFFIX),
            )?
            .rule(
                ComponentCategory::Diode,
                &format!(r"^(?P<series>1N4148|1N914){}$", SUFFIX),
            )?
            .rule(
                ComponentCategory::Diode,
                &format!(r"^(?P<series>1N\d{{3,4}}){}$", SUFFIX),
            )?;
        Ok(Self { base })
    }
}

/// Repetitive peak reverse voltage by last digit.
fn rectifier_voltage(code: &str) -> Option<f64> {
    match code {
        "1" => Some(50.0),
        "2" => Some(100.0),
        "3" => Some(200.0),
        "4" => Some(400.0),
        "5" => Some(600.0),
        "6" => Some(800.0),
        "7" => Some(1000.0),
        _ => None,
    }
}

fn schottky_voltage(code: &str) -> Option<f64> {
    match code {
        "7" => Some(20.0),
        "8" => Some(30.0),
        "9" => Some(40.0),
        _ => None,
    }
}

impl Provider for Vishay {
    delegate_to_base!();

    fn compatibility_attributes(&self, id: &PartIdentifier) -> Option<CompatibilityAttributes> {
        let m = self.claim(id)?;
        let attrs = CompatibilityAttributes::from_match(&m, id);
        let code = m.get("code").unwrap_or_default();

        let attrs = match m.category() {
            ComponentCategory::DiodeRectifier => attrs.with_family("1N400X"),
            ComponentCategory::DiodeSchottky => attrs.with_family("1N581X"),
            _ if attrs.series == "1N914" => attrs.with_family("1N4148"),
            _ => attrs,
        };
        let voltage = match m.category() {
            ComponentCategory::DiodeRectifier => rectifier_voltage(code),
            ComponentCategory::DiodeSchottky => schottky_voltage(code),
            _ => None,
        };
        Some(match voltage {
            Some(v) => attrs.with_rating(v),
            None => attrs,
        })
    }
}
