//! Custom providers: one defined in code, one from an in-memory rule table.

use partsense::prelude::*;
use partsense::tables::{RuleTable, TableProvider};
use partsense::{ProviderBase, ProviderId, ProviderRegistry, Rule};
use std::collections::BTreeSet;
use std::sync::Arc;

/// A provider for in-house part numbers such as `ACME-LED-0603-RED`.
struct InHouse {
    base: ProviderBase,
}

impl Provider for InHouse {
    fn id(&self) -> &ProviderId {
        self.base.id()
    }

    fn supported_categories(&self) -> &BTreeSet<ComponentCategory> {
        self.base.categories()
    }

    fn rules(&self) -> &[Rule] {
        self.base.rules()
    }
}

fn main() -> Result<(), PartSenseError> {
    let in_house = InHouse {
        base: ProviderBase::new("ACME", "In-house parts").rule(
            ComponentCategory::Led,
            r"^ACME-LED-(?P<package>\d{4})-(?P<series>[A-Z]+)$",
        )?,
    };

    let table: RuleTable = serde_json::from_str(
        r#"{
            "provider": "Yageo",
            "categories": ["RESISTOR"],
            "rules": [{
                "category": "RESISTOR",
                "pattern": "^(?P<series>RC(?P<size>\\d{4}))(?P<rating>[FJ])(?P<package>[RK])-\\d{2}(?P<value>\\d+[RKM]?\\d*)L?$"
            }],
            "ratings": { "J": 1.0, "F": 2.0 },
            "fixed": ["size", "value"]
        }"#,
    )?;

    let registry = ProviderRegistry::builtin()?
        .with(Arc::new(in_house))?
        .with(Arc::new(TableProvider::from_table(table)?))?;
    let resolver = Resolver::from_registry(registry)?;

    for mpn in ["ACME-LED-0603-RED", "RC0402JR-0710KL", "LM358N"] {
        match resolver.classify(mpn, None) {
            Some(result) => println!(
                "{:<20} -> {} / {} (series {}, specificity {})",
                mpn, result.provider, result.category, result.series, result.specificity
            ),
            None => println!("{:<20} -> no match", mpn),
        }
    }

    let check = resolver.replacement_via_winner("RC0402JR-0710KL", "RC0402FR-0710KL");
    println!(
        "RC0402JR-0710KL -> RC0402FR-0710KL: {}",
        check.verdict
    );

    Ok(())
}
