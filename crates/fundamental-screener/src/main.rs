//! fundamental-screener: score companies from snapshot files and print a ranked table.
//!
//! Snapshots come from a JSON file mapping symbol to financial snapshot; the
//! optional sector profile supplies display names, sectors and per-sector
//! thresholds.
//!
//! Usage:
//!   cargo run -p fundamental-screener -- --snapshots demos/sample_snapshots.json
//!   cargo run -p fundamental-screener -- --snapshots s.json --profile demos/ibex35_profile.json --model expert
//!   cargo run -p fundamental-screener -- --snapshots s.json --symbols ITX.MC SAN.MC --explain ITX.MC
//!   cargo run -p fundamental-screener -- --snapshots s.json --json

use analysis_core::{ScoringModel, SectorProfile};
use analysis_orchestrator::{
    load_sector_profile, BatchReport, BatchScorer, InMemorySnapshotProvider, ScreenerConfig,
};
use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    snapshots: Option<PathBuf>,
    profile: Option<PathBuf>,
    model: Option<ScoringModel>,
    symbols: Vec<String>,
    concurrency: Option<usize>,
    json: bool,
    explain: Option<String>,
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a String> {
    args.iter().position(|a| a == flag).and_then(|i| args.get(i + 1))
}

fn parse_args(args: &[String]) -> anyhow::Result<CliArgs> {
    let model = flag_value(args, "--model")
        .map(|v| v.parse::<ScoringModel>().map_err(anyhow::Error::msg))
        .transpose()?;
    let concurrency = flag_value(args, "--concurrency")
        .map(|v| v.parse::<usize>().context("--concurrency expects a number"))
        .transpose()?;

    let symbols = match args.iter().position(|a| a == "--symbols") {
        Some(idx) => args[idx + 1..]
            .iter()
            .take_while(|a| !a.starts_with("--"))
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    Ok(CliArgs {
        snapshots: flag_value(args, "--snapshots").map(PathBuf::from),
        profile: flag_value(args, "--profile").map(PathBuf::from),
        model,
        symbols,
        concurrency,
        json: args.iter().any(|a| a == "--json"),
        explain: flag_value(args, "--explain").cloned(),
    })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  fundamental-screener --snapshots FILE [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --profile FILE     Sector profile JSON (names, sectors, threshold overrides)");
    eprintln!("  --model NAME       general | bank | expert (default: $SCORING_MODEL or general)");
    eprintln!("  --symbols A B ...  Score only these symbols (default: every snapshot in FILE)");
    eprintln!("  --concurrency N    Max companies scored in parallel (default: $SCORING_CONCURRENCY or 8)");
    eprintln!("  --json             Print the full report as JSON");
    eprintln!("  --explain SYM      Print the rationale trail for one symbol");
}

fn init_tracing() {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new("fundamental_screener=info,analysis_orchestrator=info")
        })
    };
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter())
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter())
            .init();
    }
}

fn format_number(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{:.*}", decimals, value)
    }
}

fn print_table(report: &BatchReport) {
    println!(
        "{:<4} {:<10} {:<22} {:<20} {:>6}  {:<20} {:>9}",
        "#", "Symbol", "Company", "Sector", "Score", "Recommendation", "Price"
    );
    for (rank, row) in report.table.iter().enumerate() {
        println!(
            "{:<4} {:<10} {:<22} {:<20} {:>6}  {:<20} {:>9}",
            rank + 1,
            row.symbol,
            row.name,
            row.sector,
            format_number(row.score, 0),
            row.recommendation,
            format_number(row.price, 2)
        );
    }
    println!();
    println!(
        "{:?} model: {} scored, {} without data ({})",
        report.model,
        report.scored,
        report.failed,
        report.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
}

fn print_rationale(report: &BatchReport, symbol: &str) {
    match report.rationale_for(symbol) {
        Some(lines) => {
            println!();
            println!("Rationale for {}:", symbol);
            for line in lines {
                println!("  {}", line);
            }
        }
        None => eprintln!("{} was not part of this run", symbol),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let cli = parse_args(&args)?;

    let Some(snapshots_path) = cli.snapshots.as_ref() else {
        print_usage();
        std::process::exit(1);
    };

    let mut config = ScreenerConfig::from_env()?;
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(concurrency) = cli.concurrency {
        config.max_concurrency = concurrency;
    }
    config.validate()?;

    let provider = InMemorySnapshotProvider::from_path(snapshots_path)?;
    let profile = match &cli.profile {
        Some(path) => load_sector_profile(path)?,
        None => SectorProfile::new(),
    };
    let symbols = if cli.symbols.is_empty() {
        provider.symbols()
    } else {
        cli.symbols.clone()
    };

    tracing::info!(
        "fundamental-screener: {} symbols, {} snapshots loaded, {} profiled companies",
        symbols.len(),
        provider.len(),
        profile.len()
    );

    let scorer = BatchScorer::from_config(&config);
    let report = scorer
        .score_batch(&symbols, Arc::new(provider), Arc::new(profile))
        .await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&report);
    }
    if let Some(symbol) = &cli.explain {
        print_rationale(&report, symbol);
    }

    Ok(())
}
