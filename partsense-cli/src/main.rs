//! PartSense CLI - MPN classification and replacement checks from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use partsense::{
    classify_file, classify_mpns, BatchStats, Candidate, ComponentCategory, EngineOptions,
    LineResult, PartAttributes, ReplacementCheck, Resolver,
};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "partsense")]
#[command(about = "Manufacturer part number classification tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Extra rule-table directory (repeatable, searched before PARTSENSE_TABLES)
    #[arg(long = "tables", value_name = "DIR", global = true)]
    tables: Vec<PathBuf>,

    /// Skip built-in manufacturers and embedded tables
    #[arg(long, global = true)]
    no_builtin: bool,

    /// Provider id to leave out (repeatable)
    #[arg(long = "disable", value_name = "ID", global = true)]
    disabled: Vec<String>,

    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one or more MPNs
    Classify {
        /// Part numbers to classify
        #[arg(value_name = "MPN")]
        mpns: Vec<String>,

        /// Restrict to a category and its refinements (e.g. CONNECTOR)
        #[arg(short, long)]
        category: Option<ComponentCategory>,

        /// Read MPNs from a file, one per line
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if any MPN is unmatched
        #[arg(long)]
        fail_on_unmatched: bool,
    },

    /// Show every candidate rule for an MPN, best first
    Explain {
        #[arg(value_name = "MPN")]
        mpn: String,

        #[arg(short, long)]
        category: Option<ComponentCategory>,

        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Check whether CANDIDATE is an official replacement for ORIGINAL
    Compare {
        original: String,
        candidate: String,

        /// Provider to ask (default: the winner for ORIGINAL)
        #[arg(short, long, value_name = "ID")]
        provider: Option<String>,

        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// List registered providers
    Providers {
        /// Also list every rule with its specificity
        #[arg(long)]
        rules: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripts
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let resolver = match build_resolver(&cli) {
        Ok(resolver) => resolver,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let exit_code = match cli.command {
        Commands::Classify {
            mpns,
            category,
            file,
            format,
            fail_on_unmatched,
        } => handle_classify(&resolver, &mpns, category, file, format, fail_on_unmatched),
        Commands::Explain {
            mpn,
            category,
            format,
        } => handle_explain(&resolver, &mpn, category, format),
        Commands::Compare {
            original,
            candidate,
            provider,
            format,
        } => handle_compare(&resolver, &original, &candidate, provider, format),
        Commands::Providers { rules } => {
            handle_providers(&resolver, rules);
            0
        }
    };

    process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "partsense=debug" } else { "warn" })
    });
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn build_resolver(cli: &Cli) -> Result<Resolver, partsense::PartSenseError> {
    let mut options = EngineOptions::from_env();
    options.include_builtin = !cli.no_builtin;
    let mut table_dirs = cli.tables.clone();
    table_dirs.append(&mut options.table_dirs);
    options.table_dirs = table_dirs;
    options.disabled_providers.extend(cli.disabled.iter().cloned());

    let resolver = Resolver::from_options(&options)?;
    tracing::debug!(
        "Resolver ready: {} providers, {} rules",
        resolver.providers().len(),
        resolver.store().rule_count()
    );
    for error in resolver.providers().load_errors() {
        eprintln!("Warning: {}", error);
    }
    Ok(resolver)
}

fn handle_classify(
    resolver: &Resolver,
    mpns: &[String],
    category: Option<ComponentCategory>,
    file: Option<PathBuf>,
    format: OutputFormat,
    fail_on_unmatched: bool,
) -> i32 {
    let mut results = classify_mpns(resolver, mpns, category);
    if let Some(path) = file {
        match classify_file(resolver, &path, category) {
            Ok(lines) => results.extend(lines),
            Err(e) => {
                eprintln!("Error: {}: {}", path.display(), e);
                return 1;
            }
        }
    }
    if results.is_empty() {
        eprintln!("Error: no part numbers given (pass MPNs or --file)");
        return 1;
    }

    let stats = BatchStats::from_results(&results);
    match format {
        OutputFormat::Human => output_human(&results, &stats),
        OutputFormat::Json => output_json(&results, &stats),
    }

    if fail_on_unmatched && stats.unmatched > 0 {
        1
    } else {
        0
    }
}

fn describe_attributes(attributes: &PartAttributes) -> String {
    let mut parts = Vec::new();
    if let Some(density) = attributes.density_mbit {
        parts.push(format!("density={}Mbit", density));
    }
    if let Some(pins) = attributes.pin_count {
        parts.push(format!("pins={}", pins));
    }
    if let Some(flash) = attributes.flash_size_kb {
        parts.push(format!("flash={}KB", flash));
    }
    if let Some(grade) = attributes.temperature_grade {
        let (low, high) = grade.range();
        parts.push(format!("temp={}..{}C", low, high));
    }
    parts.join(" ")
}

fn output_human(results: &[LineResult], stats: &BatchStats) {
    for line in results {
        match &line.result {
            Some(result) => {
                println!("{}", line.mpn);
                println!("  category:    {}", result.category);
                println!("  provider:    {}", result.provider);
                println!("  series:      {}", result.series);
                println!("  package:     {}", result.package_code);
                println!("  specificity: {}", result.specificity);
                if !result.attributes.is_empty() {
                    println!("  attributes:  {}", describe_attributes(&result.attributes));
                }
            }
            None => println!("{}\n  no match", line.mpn),
        }
    }

    if stats.total > 1 {
        println!("{}", "─".repeat(40));
        println!(
            "{} parts: {} classified, {} unmatched",
            stats.total, stats.matched, stats.unmatched
        );
    }
}

fn output_json(results: &[LineResult], stats: &BatchStats) {
    let output = serde_json::json!({
        "results": results,
        "summary": stats,
    });
    print_json(&output);
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn handle_explain(
    resolver: &Resolver,
    mpn: &str,
    category: Option<ComponentCategory>,
    format: OutputFormat,
) -> i32 {
    let candidates: Vec<Candidate> = resolver.candidates(mpn, category);
    let winner = resolver.classify(mpn, category);

    match format {
        OutputFormat::Human => {
            if candidates.is_empty() {
                println!("{}: no candidate rules", mpn);
            }
            for (index, candidate) in candidates.iter().enumerate() {
                println!(
                    "{:>2}. {:<12} {:<20} specificity={:<4} {}",
                    index + 1,
                    candidate.provider.as_str(),
                    candidate.category.as_str(),
                    candidate.specificity.value(),
                    candidate.pattern
                );
            }
            if let Some(result) = &winner {
                println!("\nwinner: {} {}", result.provider, result.category);
            }
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "mpn": mpn,
            "candidates": candidates,
            "winner": winner,
        })),
    }
    0
}

fn handle_compare(
    resolver: &Resolver,
    original: &str,
    candidate: &str,
    provider: Option<String>,
    format: OutputFormat,
) -> i32 {
    let check = match provider {
        Some(id) => {
            if resolver.provider(&id).is_none() {
                eprintln!("Error: unknown provider {}", id);
                return 1;
            }
            ReplacementCheck {
                original: original.to_string(),
                candidate: candidate.to_string(),
                verdict: resolver.evaluate_replacement(&id, original, candidate),
                provider: Some(id.as_str().into()),
            }
        }
        None => resolver.replacement_via_winner(original, candidate),
    };

    match format {
        OutputFormat::Human => {
            let provider = check
                .provider
                .as_ref()
                .map(|p| p.to_string())
                .unwrap_or_else(|| "no provider".to_string());
            println!(
                "{} -> {}: {} [{}]",
                check.original, check.candidate, check.verdict, provider
            );
        }
        OutputFormat::Json => print_json(&serde_json::json!(check)),
    }

    if check.is_compatible() {
        0
    } else {
        1
    }
}

fn handle_providers(resolver: &Resolver, rules: bool) {
    println!("Registered providers:\n");

    let store = resolver.store();
    for provider in resolver.providers().iter() {
        let categories: Vec<_> = provider
            .supported_categories()
            .iter()
            .map(|c| c.as_str())
            .collect();
        println!("  {}", provider.id());
        if !provider.description().is_empty() {
            println!("    {}", provider.description());
        }
        println!("    categories: {}", categories.join(", "));
        println!("    rules:      {}", provider.rules().len());
        if rules {
            for rule in provider.rules() {
                println!(
                    "      [{:>3}] {:<20} {}",
                    rule.specificity().value(),
                    rule.category().as_str(),
                    rule.pattern()
                );
            }
        }
        println!();
    }

    println!(
        "{} providers, {} rules",
        resolver.providers().len(),
        store.rule_count()
    );
}
