//! Sharing a frozen resolver across threads

use partsense::prelude::*;
use partsense::{EngineOptions, ProviderRegistry};
use std::sync::Arc;
use std::thread;

const PARTS: [&str; 6] = [
    "504182-0210",
    "LM358N",
    "1N4007",
    "GD25Q128CSIG",
    "2N7002",
    "ABM8-16.000MHZ-B2-T",
];

#[test]
fn test_concurrent_classification_is_deterministic() {
    let resolver = Arc::new(Resolver::builtin().unwrap());
    let expected: Vec<_> = PARTS.iter().map(|p| resolver.classify(p, None)).collect();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            thread::spawn(move || {
                (0..50)
                    .map(|_| PARTS.iter().map(|p| resolver.classify(p, None)).collect::<Vec<_>>())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for run in handle.join().unwrap() {
            assert_eq!(run, expected);
        }
    }
}

#[test]
fn test_handle_swap_under_readers() {
    let handle = ResolverHandle::new(Resolver::builtin().unwrap());

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let handle = handle.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let resolver = handle.current();
                    // Either generation classifies the connector the same way.
                    let result = resolver.classify("504182-0210", None).unwrap();
                    assert_eq!(result.provider.as_str(), "Amphenol");
                }
            })
        })
        .collect();

    let without_ti = Resolver::from_options(&EngineOptions::default().without_provider("TI")).unwrap();
    let previous = handle.swap(without_ti);
    assert!(previous.classify("LM358N", None).is_some());

    for reader in readers {
        reader.join().unwrap();
    }
    assert!(handle.current().classify("LM358N", None).is_none());
}

#[test]
fn test_store_rebuild_gives_identical_results() {
    let first = Resolver::from_registry(ProviderRegistry::builtin().unwrap()).unwrap();
    let second = Resolver::from_registry(ProviderRegistry::builtin().unwrap()).unwrap();
    for part in PARTS {
        assert_eq!(first.candidates(part, None), second.candidates(part, None));
    }
}
