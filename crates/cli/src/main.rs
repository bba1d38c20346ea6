//! CLI entry point for the news labeler.
//!
//! Subcommands:
//!   - `label`: align news events with daily prices and write three-way labels
//!   - `normalize`: z-score trailing price windows and write them with their titles

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use newslabel_core::{Config, PriceField};
use newslabel_features::{normalize_windows, Histogram};
use newslabel_ingestion::{
    distinct_symbols, load_events, load_price_book, read_price_windows, write_labels,
    write_window_rows,
};
use newslabel_labeling::{Aligner, LabelCounts, RunStats};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI argument structs
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "news-labeler",
    version,
    about = "Label news articles by the price move that followed them",
    propagate_version = true
)]
struct Cli {
    /// Path to a TOML (or .json) config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Align news events with price history and write labels
    Label(LabelArgs),
    /// Z-score trailing price windows
    Normalize(NormalizeArgs),
}

#[derive(Parser, Debug, Default)]
struct LabelArgs {
    /// News CSV with title, symbol and date columns
    #[arg(long)]
    events: PathBuf,

    /// Directory of per-symbol `{SYMBOL}.csv` price files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Output CSV path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Calendar days from the event to the target day
    #[arg(long)]
    horizon_days: Option<i64>,

    /// Label threshold on the relative change
    #[arg(long)]
    threshold: Option<f64>,

    /// Price field read at the anchor (open, high, low, close)
    #[arg(long)]
    anchor_field: Option<PriceField>,

    /// Price field read at the target (open, high, low, close)
    #[arg(long)]
    target_field: Option<PriceField>,

    /// Align events on all cores
    #[arg(long)]
    parallel: bool,

    /// Skip symbol files with malformed rows instead of failing
    #[arg(long)]
    skip_malformed: bool,
}

#[derive(Parser, Debug)]
struct NormalizeArgs {
    /// CSV of title followed by price columns
    #[arg(long)]
    input: PathBuf,

    /// Output CSV path
    #[arg(long)]
    output: PathBuf,

    /// Number of trailing price columns per row
    #[arg(long)]
    width: Option<usize>,
}

// ---------------------------------------------------------------------------
// Config resolution
// ---------------------------------------------------------------------------

fn base_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path).with_context(|| format!("Failed to load config {:?}", path)),
        None => Ok(Config::default()),
    }
}

/// Apply command-line overrides on top of the file configuration.
fn label_config(mut config: Config, args: &LabelArgs) -> Result<Config> {
    if let Some(dir) = &args.data_dir {
        config.loader.data_dir = dir.clone();
    }
    if let Some(output) = &args.output {
        config.output.path = output.clone();
    }
    if let Some(horizon) = args.horizon_days {
        config.aligner.horizon_days = horizon;
    }
    if let Some(threshold) = args.threshold {
        config.aligner.threshold = threshold;
    }
    if let Some(field) = args.anchor_field {
        config.aligner.anchor_field = field;
    }
    if let Some(field) = args.target_field {
        config.aligner.target_field = field;
    }
    config.output.parallel |= args.parallel;
    config.loader.skip_malformed |= args.skip_malformed;

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

/// Outcome of the `label` subcommand.
struct LabelSummary {
    stats: RunStats,
    labels: LabelCounts,
    written: usize,
}

fn run_label(config: &Config, events_path: &Path) -> Result<LabelSummary> {
    let events = load_events(events_path, &config.events)
        .with_context(|| format!("Failed to load events from {:?}", events_path))?;

    let symbols = distinct_symbols(&events);
    let book = load_price_book(&config.loader, &symbols).with_context(|| {
        format!("Failed to load price history from {:?}", config.loader.data_dir)
    })?;

    let aligner = Aligner::new(config.aligner.clone())?;
    let run = if config.output.parallel {
        aligner.run_parallel(&events, &book)
    } else {
        aligner.run(&events, &book)
    };

    let written = write_labels(&config.output.path, &run.results)
        .with_context(|| format!("Failed to write labels to {:?}", config.output.path))?;

    Ok(LabelSummary {
        stats: run.stats,
        labels: LabelCounts::from_results(&run.results),
        written,
    })
}

/// Outcome of the `normalize` subcommand.
struct NormalizeSummary {
    written: usize,
    dropped: usize,
    histogram: Histogram,
}

fn run_normalize(config: &Config, args: &NormalizeArgs) -> Result<NormalizeSummary> {
    let width = args.width.unwrap_or(config.windows.width);
    let windows = read_price_windows(&args.input, width)
        .with_context(|| format!("Failed to read price windows from {:?}", args.input))?;
    info!(rows = windows.len(), width, "Loaded price windows");

    let normalized = normalize_windows(windows);
    let zscores: Vec<f64> = normalized
        .rows
        .iter()
        .flat_map(|row| row.zscores.iter().copied())
        .collect();
    let histogram = Histogram::compute(&zscores, config.windows.histogram_bins);
    info!(counts = ?histogram.counts, "Z-score histogram");
    info!(edges = ?histogram.edges, "Z-score histogram bin edges");

    let written = write_window_rows(&args.output, &normalized.rows, width)
        .with_context(|| format!("Failed to write {:?}", args.output))?;

    Ok(NormalizeSummary {
        written,
        dropped: normalized.dropped,
        histogram,
    })
}

fn main() -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let cli = Cli::parse();
    let config = base_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Label(args) => {
            let config = label_config(config, &args)?;
            let summary = run_label(&config, &args.events)?;

            let stats_json = serde_json::to_string(&summary.stats)?;
            info!(stats = %stats_json, "Run stats");
            println!("\n================ STATS ================");
            println!("{}", summary.stats);
            println!("labels: {}", summary.labels);
            println!("\nSaved labeled dataset to: {}", config.output.path.display());
            println!("Total valid labeled samples: {}", summary.written);
        }
        Commands::Normalize(args) => {
            let summary = run_normalize(&config, &args)?;
            println!("Dropped {} rows with invalid z-scores", summary.dropped);
            println!("Saved {} rows to: {}", summary.written, args.output.display());
        }
    }

    Ok(())
}
