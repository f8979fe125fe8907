//! Rule tables loaded from directories

use partsense::prelude::*;
use partsense::tables::{load_directory, TableProvider};
use partsense::ProviderRegistry;
use std::fs;
use std::path::PathBuf;

fn fixture_tables() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("tables")
}

#[test]
fn test_directory_tables_become_providers() {
    let options = EngineOptions::default().with_table_dir(fixture_tables());
    let resolver = Resolver::from_options(&options).unwrap();

    let result = resolver.classify("RC0603FR-0710KL", None).unwrap();
    assert_eq!(result.provider.as_str(), "Yageo");
    assert_eq!(result.category, ComponentCategory::Resistor);
    assert_eq!(result.series, "RC0603");
    assert_eq!(result.package_code, "R");
}

#[test]
fn test_table_rating_and_fixed_captures() {
    let options = EngineOptions::default().with_table_dir(fixture_tables());
    let r = Resolver::from_options(&options).unwrap();

    // 1% replaces 5%
    assert_eq!(
        r.evaluate_replacement("Yageo", "RC0603JR-0710KL", "RC0603FR-0710KL"),
        Replacement::Upgrade
    );
    assert!(!r.is_official_replacement("Yageo", "RC0603FR-0710KL", "RC0603JR-0710KL"));
    // reel size and packaging are cosmetic
    assert!(r.is_official_replacement("Yageo", "RC0603FR-0710KL", "RC0603FK-1310KL"));
    // value and case size are not
    assert!(!r.is_official_replacement("Yageo", "RC0603FR-0710KL", "RC0603FR-074K7L"));
    assert!(!r.is_official_replacement("Yageo", "RC0603FR-0710KL", "RC0805FR-0710KL"));
}

#[test]
fn test_directory_table_overrides_embedded_one() {
    let builtin = Resolver::builtin().unwrap();
    assert_eq!(
        builtin.classify("2N7002LT1G", None).unwrap().provider.as_str(),
        "onsemi"
    );

    let options = EngineOptions::default().with_table_dir(fixture_tables());
    let r = Resolver::from_options(&options).unwrap();
    assert!(r.classify("2N7002LT1G", None).is_none());
    assert_eq!(r.classify("BSS84", None).unwrap().provider.as_str(), "onsemi");

    // position in registration order is kept
    let registry = r.providers();
    let ids: Vec<_> = registry.iter().map(|p| p.id().to_string()).collect();
    let onsemi = ids.iter().position(|id| id == "onsemi").unwrap();
    let yageo = ids.iter().position(|id| id == "Yageo").unwrap();
    assert!(onsemi < yageo);
}

#[test]
fn test_earlier_directory_wins() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let table = |pattern: &str| {
        format!(
            r#"{{
                "provider": "Acme",
                "categories": ["LED"],
                "rules": [{{ "category": "LED", "pattern": "{}" }}]
            }}"#,
            pattern
        )
    };
    fs::write(first.path().join("acme.json"), table("^ACME-RED")).unwrap();
    fs::write(second.path().join("acme.json"), table("^ACME-BLUE")).unwrap();

    let options = EngineOptions::default()
        .with_table_dir(first.path())
        .with_table_dir(second.path());
    let r = Resolver::from_options(&options).unwrap();

    assert!(r.classify("ACME-RED-0603", None).is_some());
    assert!(r.classify("ACME-BLUE-0603", None).is_none());
}

#[test]
fn test_malformed_tables_are_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    fs::write(
        dir.path().join("bad_pattern.json"),
        r#"{ "provider": "Bad", "categories": ["LED"], "rules": [{ "category": "LED", "pattern": "^(" }] }"#,
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
    fs::copy(fixture_tables().join("yageo.json"), dir.path().join("yageo.json")).unwrap();

    let (providers, errors) = load_directory(dir.path());
    assert_eq!(providers.len(), 1);
    assert_eq!(errors.len(), 2);

    let options = EngineOptions::default().with_table_dir(dir.path());
    let registry = ProviderRegistry::from_options(&options).unwrap();
    assert!(registry.contains("Yageo"));
    assert!(!registry.contains("Bad"));
    assert_eq!(registry.load_errors().len(), 2);
}

#[test]
fn test_without_builtin_only_tables_load() {
    let options = EngineOptions {
        include_builtin: false,
        table_dirs: vec![fixture_tables()],
        disabled_providers: vec![],
    };
    let r = Resolver::from_options(&options).unwrap();
    assert!(r.classify("LM358N", None).is_none());
    assert!(r.classify("RC0603FR-0710KL", None).is_some());
    assert_eq!(r.providers().len(), 2);
}

#[test]
fn test_rule_outside_table_categories_rejected() {
    let table = serde_json::from_str(
        r#"{ "provider": "Acme", "categories": ["LED"], "rules": [{ "category": "DIODE", "pattern": "^X" }] }"#,
    )
    .unwrap();
    let err = TableProvider::from_table(table).unwrap_err();
    assert!(matches!(err, PartSenseError::UndeclaredCategory { .. }));
}
