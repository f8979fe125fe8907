//! Classify a bill of materials (one MPN per line) and print a summary.

use partsense::prelude::*;
use partsense::{classify_file, BatchStats};
use std::path::Path;

fn main() -> Result<(), PartSenseError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/bom.txt".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example classify_bom [path/to/bom.txt]");
        std::process::exit(1);
    }

    let resolver = Resolver::from_options(&EngineOptions::from_env())?;
    let results = classify_file(&resolver, path, None)?;

    println!("Classification results for: {}", path.display());
    println!();

    for line in &results {
        match &line.result {
            Some(result) => {
                println!(
                    "{:>4}  {:<24} {:<18} {:<10} series={} package={}",
                    line.line,
                    line.mpn,
                    result.category.as_str(),
                    result.provider.as_str(),
                    result.series,
                    result.package_code
                );
            }
            None => println!("{:>4}  {:<24} (no match)", line.line, line.mpn),
        }
    }

    let stats = BatchStats::from_results(&results);
    println!();
    println!(
        "Summary: {} parts, {} classified, {} unmatched",
        stats.total, stats.matched, stats.unmatched
    );

    Ok(())
}
