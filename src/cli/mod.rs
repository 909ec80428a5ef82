//! Command-line parsing for the sales analysis tool.
//!
//! Argument parsing and command dispatch stay separate from the engine; the
//! parsed values are merged into `AppConfig` before anything runs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::AppConfig;
use crate::domain::CategorySource;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sales", version, about = "Offline sales aggregation and reporting")]
pub struct Cli {
    /// Configuration file (defaults to `sales.toml` when present).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write a demo sales CSV.
    Generate(GenerateArgs),
    /// Load the sales CSV and print a report.
    Report(ReportArgs),
    /// Write every report as JSON.
    Export(ExportArgs),
    /// Replace the sales CSV with fresh demo data, reload it and print the dashboard.
    Regenerate(DataArgs),
}

/// Data file override shared by several commands.
#[derive(Debug, Args, Clone, Default)]
pub struct DataArgs {
    /// Sales CSV (overrides config and `SALES_DATA_PATH`).
    #[arg(long, value_name = "CSV")]
    pub data: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    /// Number of records to generate.
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Random seed (random when absent).
    #[arg(long)]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub data: DataArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    /// Which report to print.
    #[arg(value_enum, default_value_t = ReportView::Dashboard)]
    pub view: ReportView,

    #[command(flatten)]
    pub data: DataArgs,

    /// Number of products in the top-products list.
    #[arg(long)]
    pub top: Option<usize>,

    /// Where the category of a record comes from.
    #[arg(long, value_enum)]
    pub category_source: Option<CategorySource>,

    /// Generate demo data first when the CSV does not exist.
    #[arg(long)]
    pub generate_missing: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    /// Output JSON file.
    #[arg(long, value_name = "JSON")]
    pub out: PathBuf,

    #[command(flatten)]
    pub data: DataArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportView {
    Dashboard,
    Summary,
    Categories,
    Products,
    Regions,
    Trend,
    Customers,
    Performance,
    Forecast,
    About,
}

impl Cli {
    /// Log level from `-v`/`-q`, falling back to the configured level.
    pub fn log_level(&self, configured: &str) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            configured.parse().unwrap_or(tracing::Level::INFO)
        }
    }

    /// Apply command flags on top of the resolved configuration.
    pub fn merge_into(&self, config: &mut AppConfig) {
        match &self.command {
            Command::Generate(args) => {
                apply_data(&args.data, config);
                if let Some(count) = args.count {
                    config.data.default_records = count;
                }
                if args.seed.is_some() {
                    config.data.seed = args.seed;
                }
            }
            Command::Report(args) => {
                apply_data(&args.data, config);
                if let Some(top) = args.top {
                    config.analysis.top_n = top;
                }
                if let Some(source) = args.category_source {
                    config.analysis.category_source = source;
                }
                if args.generate_missing {
                    config.data.auto_generate = true;
                }
            }
            Command::Export(args) => apply_data(&args.data, config),
            Command::Regenerate(args) => apply_data(args, config),
        }
    }
}

fn apply_data(args: &DataArgs, config: &mut AppConfig) {
    if let Some(path) = &args.data {
        config.data.path = path.clone();
    }
}
