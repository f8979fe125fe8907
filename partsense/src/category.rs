//! Component Category Vocabulary
//!
//! The closed set of component kinds the engine can classify into. Categories
//! form a two-level hierarchy: generic kinds (e.g. `MEMORY`) and
//! manufacturer-qualified refinements (e.g. `MEMORY_FLASH`, `MOSFET_NXP`)
//! which each name exactly one generic parent.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentCategory {
    // Generic kinds
    Connector,
    Ic,
    Opamp,
    TemperatureSensor,
    VoltageRegulator,
    Memory,
    Microcontroller,
    Mosfet,
    Diode,
    Crystal,
    Resistor,
    Capacitor,
    Inductor,
    Led,

    // Manufacturer-qualified refinements
    MemoryFlash,
    MemoryEeprom,
    MosfetNxp,
    DiodeRectifier,
    DiodeSchottky,
}

impl ComponentCategory {
    /// Every category, generic kinds first.
    pub const ALL: [ComponentCategory; 19] = [
        ComponentCategory::Connector,
        ComponentCategory::Ic,
        ComponentCategory::Opamp,
        ComponentCategory::TemperatureSensor,
        ComponentCategory::VoltageRegulator,
        ComponentCategory::Memory,
        ComponentCategory::Microcontroller,
        ComponentCategory::Mosfet,
        ComponentCategory::Diode,
        ComponentCategory::Crystal,
        ComponentCategory::Resistor,
        ComponentCategory::Capacitor,
        ComponentCategory::Inductor,
        ComponentCategory::Led,
        ComponentCategory::MemoryFlash,
        ComponentCategory::MemoryEeprom,
        ComponentCategory::MosfetNxp,
        ComponentCategory::DiodeRectifier,
        ComponentCategory::DiodeSchottky,
    ];

    /// The generic parent of this category, or the category itself when it
    /// is already generic.
    pub fn generic(self) -> ComponentCategory {
        match self {
            ComponentCategory::MemoryFlash | ComponentCategory::MemoryEeprom => {
                ComponentCategory::Memory
            }
            ComponentCategory::MosfetNxp => ComponentCategory::Mosfet,
            ComponentCategory::DiodeRectifier | ComponentCategory::DiodeSchottky => {
                ComponentCategory::Diode
            }
            other => other,
        }
    }

    pub fn is_specialization(self) -> bool {
        self.generic() != self
    }

    /// Refinements whose generic parent is `self`.
    pub fn specializations(self) -> impl Iterator<Item = ComponentCategory> {
        ComponentCategory::ALL
            .into_iter()
            .filter(move |c| c.is_specialization() && c.generic() == self)
    }

    /// True when `self` is `other` or one of its refinements.
    pub fn falls_under(self, other: ComponentCategory) -> bool {
        self == other || self.generic() == other
    }

    /// Canonical upper snake case name, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentCategory::Connector => "CONNECTOR",
            ComponentCategory::Ic => "IC",
            ComponentCategory::Opamp => "OPAMP",
            ComponentCategory::TemperatureSensor => "TEMPERATURE_SENSOR",
            ComponentCategory::VoltageRegulator => "VOLTAGE_REGULATOR",
            ComponentCategory::Memory => "MEMORY",
            ComponentCategory::Microcontroller => "MICROCONTROLLER",
            ComponentCategory::Mosfet => "MOSFET",
            ComponentCategory::Diode => "DIODE",
            ComponentCategory::Crystal => "CRYSTAL",
            ComponentCategory::Resistor => "RESISTOR",
            ComponentCategory::Capacitor => "CAPACITOR",
            ComponentCategory::Inductor => "INDUCTOR",
            ComponentCategory::Led => "LED",
            ComponentCategory::MemoryFlash => "MEMORY_FLASH",
            ComponentCategory::MemoryEeprom => "MEMORY_EEPROM",
            ComponentCategory::MosfetNxp => "MOSFET_NXP",
            ComponentCategory::DiodeRectifier => "DIODE_RECTIFIER",
            ComponentCategory::DiodeSchottky => "DIODE_SCHOTTKY",
        }
    }

    /// Human-readable description
    pub fn description(self) -> &'static str {
        match self {
            ComponentCategory::Connector => "Board or cable connector",
            ComponentCategory::Ic => "Generic integrated circuit",
            ComponentCategory::Opamp => "Operational amplifier",
            ComponentCategory::TemperatureSensor => "Temperature measurement sensor",
            ComponentCategory::VoltageRegulator => "Linear or switching voltage regulator",
            ComponentCategory::Memory => "Memory device",
            ComponentCategory::Microcontroller => "Microcontroller unit",
            ComponentCategory::Mosfet => "Field-effect transistor",
            ComponentCategory::Diode => "Diode",
            ComponentCategory::Crystal => "Quartz crystal resonator",
            ComponentCategory::Resistor => "Resistor",
            ComponentCategory::Capacitor => "Capacitor",
            ComponentCategory::Inductor => "Inductor",
            ComponentCategory::Led => "Light emitting diode",
            ComponentCategory::MemoryFlash => "Serial NOR/NAND flash memory",
            ComponentCategory::MemoryEeprom => "Serial EEPROM",
            ComponentCategory::MosfetNxp => "NXP/Nexperia MOSFET",
            ComponentCategory::DiodeRectifier => "General purpose rectifier diode",
            ComponentCategory::DiodeSchottky => "Schottky barrier diode",
        }
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown component category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for ComponentCategory {
    type Err = UnknownCategory;

    /// Accepts the canonical name in any case, with `-` or `_` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase().replace('-', "_");
        ComponentCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_parent() {
        assert_eq!(ComponentCategory::MemoryFlash.generic(), ComponentCategory::Memory);
        assert_eq!(ComponentCategory::MosfetNxp.generic(), ComponentCategory::Mosfet);
        assert_eq!(ComponentCategory::Connector.generic(), ComponentCategory::Connector);
        assert!(ComponentCategory::DiodeSchottky.is_specialization());
        assert!(!ComponentCategory::Diode.is_specialization());
    }

    #[test]
    fn test_specializations() {
        let diode: Vec<_> = ComponentCategory::Diode.specializations().collect();
        assert_eq!(
            diode,
            vec![ComponentCategory::DiodeRectifier, ComponentCategory::DiodeSchottky]
        );
        assert_eq!(ComponentCategory::Crystal.specializations().count(), 0);
        assert_eq!(ComponentCategory::MemoryFlash.specializations().count(), 0);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("memory_flash".parse(), Ok(ComponentCategory::MemoryFlash));
        assert_eq!("Mosfet-NXP".parse(), Ok(ComponentCategory::MosfetNxp));
        assert_eq!(" opamp ".parse(), Ok(ComponentCategory::Opamp));
        assert!("transistorish".parse::<ComponentCategory>().is_err());
        assert_eq!(ComponentCategory::TemperatureSensor.to_string(), "TEMPERATURE_SENSOR");
    }

    #[test]
    fn test_serde_matches_display() {
        for category in ComponentCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category));
        }
    }
}
