//! Built-in Manufacturer Providers
//!
//! Providers whose part numbers need decoding beyond plain captures (code
//! letters for flash size, grade prefixes, voltage digits). Manufacturers
//! that fit the table format live in `tables/*.json` instead.
//!
//! | Provider   | Categories                                          |
//! |------------|-----------------------------------------------------|
//! | Amphenol   | CONNECTOR                                           |
//! | TI         | OPAMP, TEMPERATURE_SENSOR, VOLTAGE_REGULATOR, IC    |
//! | Vishay     | DIODE, DIODE_RECTIFIER, DIODE_SCHOTTKY              |
//! | GigaDevice | MEMORY, MEMORY_FLASH, MICROCONTROLLER               |
//! | NXP        | MOSFET, MOSFET_NXP                                  |

pub mod amphenol;
pub mod gigadevice;
pub mod nxp;
pub mod texas_instruments;
pub mod vishay;

use std::sync::Arc;

use crate::core::PartSenseError;
use crate::provider::Provider;

pub use amphenol::Amphenol;
pub use gigadevice::GigaDevice;
pub use nxp::Nxp;
pub use texas_instruments::TexasInstruments;
pub use vishay::Vishay;

/// Every built-in manufacturer, in registration order.
pub fn all() -> Result<Vec<Arc<dyn Provider>>, PartSenseError> {
    let providers: Vec<Arc<dyn Provider>> = vec![
        Arc::new(Amphenol::new()?),
        Arc::new(TexasInstruments::new()?),
        Arc::new(Vishay::new()?),
        Arc::new(GigaDevice::new()?),
        Arc::new(Nxp::new()?),
    ];
    Ok(providers)
}

/// Implements the identity half of [`Provider`] by delegating to a
/// `base: ProviderBase` field.
macro_rules! delegate_to_base {
    () => {
        fn id(&self) -> &$crate::provider::ProviderId {
            self.base.id()
        }

        fn description(&self) -> &str {
            self.base.description()
        }

        fn supported_categories(
            &self,
        ) -> &std::collections::BTreeSet<$crate::category::ComponentCategory> {
            self.base.categories()
        }

        fn rules(&self) -> &[$crate::rule::Rule] {
            self.base.rules()
        }
    };
}

pub(crate) use delegate_to_base;
