//! GigaDevice
//!
//! SPI NOR flash (`GD25Q128CSIG`):
//!
//! ```text
//! GD25 Q 128 C S I G
//!      |  |  | | | +- green code
//!      |  |  | | +--- temperature (I = -40..85, E = -40..105, J = -40..125)
//!      |  |  | +----- package
//!      |  |  +------- generation
//!      |  +---------- density (Mbit)
//!      +------------- voltage / interface family
//! ```
//!
//! GD32 microcontrollers (`GD32F103C8T6`): series, pin-count letter,
//! flash-size code, package letter, temperature digit.

use crate::category::ComponentCategory;
use crate::core::PartSenseError;
use crate::identifier::PartIdentifier;
use crate::manufacturers::delegate_to_base;
use crate::provider::{
    CompatibilityAttributes, PartAttributes, Provider, ProviderBase, TemperatureGrade,
};

#[derive(Debug, Clone)]
pub struct GigaDevice {
    base: ProviderBase,
}

impl GigaDevice {
    pub const ID: &'static str = "GigaDevice";

    pub fn new() -> Result<Self, PartSenseError> {
        let base = ProviderBase::new(Self::ID, "SPI NOR flash and GD32 microcontrollers")
            .rule(
                ComponentCategory::MemoryFlash,
                r"^(?P<series>GD25(?P<voltage>[A-Z]{1,2})(?P<density>\d{2,3}))(?P<generation>[A-Z])?(?P<package>[A-Z])?(?P<temp>[IEJ])?(?P<green>[GYR])?R?$",
            )?
            .rule(
                ComponentCategory::Microcontroller,
                r"^(?P<series>GD32(?P<core>[A-Z])(?P<line>\d{3}))(?P<pins>[FGKTCRVZIB])(?P<flash>[468BCDEFGIK])(?:(?P<package>[HTUY])(?P<temp>[67])?)?$",
            )?;
        Ok(Self { base })
    }
}

fn flash_temperature(code: &str) -> Option<TemperatureGrade> {
    match code {
        "I" => Some(TemperatureGrade::Industrial),
        "E" => Some(TemperatureGrade::Extended),
        "J" => Some(TemperatureGrade::Automotive),
        _ => None,
    }
}

fn mcu_pin_count(code: &str) -> Option<u32> {
    match code {
        "F" => Some(20),
        "G" => Some(28),
        "K" => Some(32),
        "T" => Some(36),
        "C" => Some(48),
        "R" => Some(64),
        "V" => Some(100),
        "Z" => Some(144),
        "I" => Some(176),
        "B" => Some(208),
        _ => None,
    }
}

fn mcu_flash_kb(code: &str) -> Option<u32> {
    match code {
        "4" => Some(16),
        "6" => Some(32),
        "8" => Some(64),
        "B" => Some(128),
        "C" => Some(256),
        "D" => Some(384),
        "E" => Some(512),
        "F" => Some(768),
        "G" => Some(1024),
        "I" => Some(2048),
        "K" => Some(3072),
        _ => None,
    }
}

fn mcu_temperature(code: &str) -> Option<TemperatureGrade> {
    match code {
        "6" => Some(TemperatureGrade::Industrial),
        "7" => Some(TemperatureGrade::Extended),
        _ => None,
    }
}

impl Provider for GigaDevice {
    delegate_to_base!();

    fn extract_attributes(&self, id: &PartIdentifier) -> PartAttributes {
        let Some(m) = self.claim(id) else {
            return PartAttributes::default();
        };
        match m.category() {
            ComponentCategory::MemoryFlash => PartAttributes {
                density_mbit: m.get_number("density"),
                temperature_grade: m.get("temp").and_then(flash_temperature),
                ..Default::default()
            },
            ComponentCategory::Microcontroller => PartAttributes {
                pin_count: m.get("pins").and_then(mcu_pin_count),
                flash_size_kb: m.get("flash").and_then(mcu_flash_kb),
                temperature_grade: m.get("temp").and_then(mcu_temperature),
                ..Default::default()
            },
            _ => PartAttributes::default(),
        }
    }

    fn compatibility_attributes(&self, id: &PartIdentifier) -> Option<CompatibilityAttributes> {
        let m = self.claim(id)?;
        let attributes = self.extract_attributes(id);
        let attrs = CompatibilityAttributes::from_match(&m, id).with_attributes(&attributes);
        let package = attrs.package.clone();

        Some(match m.category() {
            ComponentCategory::MemoryFlash => {
                let family = format!("GD25{}", m.get("voltage").unwrap_or_default());
                let attrs = attrs.with_family(family).with_fixed("package", package);
                match attributes.density_mbit {
                    Some(density) => attrs.with_rating(f64::from(density)),
                    None => attrs,
                }
            }
            ComponentCategory::Microcontroller => {
                let attrs = attrs
                    .with_fixed("pins", m.get("pins").unwrap_or_default())
                    .with_fixed("package", package);
                match attributes.flash_size_kb {
                    Some(kb) => attrs.with_rating(f64::from(kb)),
                    None => attrs,
                }
            }
            _ => attrs,
        })
    }
}
