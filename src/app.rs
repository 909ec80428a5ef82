//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and resolves configuration
//! - installs the log subscriber
//! - opens (or generates) the sales data
//! - prints reports and writes exports

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::cli::{Cli, Command, ReportView};
use crate::config::AppConfig;
use crate::data::{GenerationSummary, GeneratorConfig};
use crate::engine::{EventSink, SalesAnalyzer, TracingSink};
use crate::error::AppError;
use crate::report;

pub mod session;

use session::{Session, generate_fixture};

/// Entry point for the `sales` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let mut config = AppConfig::resolve(cli.config.as_deref())?;
    cli.merge_into(&mut config);

    if config.logging.enabled {
        init_logging(cli.log_level(&config.logging.level));
    }
    debug!(config = %config.summary(), "configuration resolved");

    let sink: Arc<dyn EventSink> = Arc::new(TracingSink);
    let today = Local::now().date_naive();

    match &cli.command {
        Command::Generate(_) => handle_generate(&config, today),
        Command::Report(args) => handle_report(config, sink, args.view, today),
        Command::Export(args) => handle_export(config, sink, &args.out, today),
        Command::Regenerate(_) => handle_regenerate(config, sink, today),
    }
}

/// Install the global `tracing` subscriber; `RUST_LOG` takes precedence over `level`.
fn init_logging(level: tracing::Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn handle_generate(config: &AppConfig, today: NaiveDate) -> Result<(), AppError> {
    let summary = generate_fixture(&config.data.path, &GeneratorConfig::from(&config.data), today)?;
    print!("{}", report::format_generation(&summary, &config.data.path));
    Ok(())
}

fn handle_report(
    config: AppConfig,
    sink: Arc<dyn EventSink>,
    view: ReportView,
    today: NaiveDate,
) -> Result<(), AppError> {
    let (session, generated) = open_session(config, sink, today)?;
    if let Some(summary) = &generated {
        println!("{}", report::format_generation(summary, session.data_path()));
    }

    let snapshot = session.snapshot();
    print!("{}", render_view(view, &snapshot, session.config(), today));
    Ok(())
}

fn handle_export(
    config: AppConfig,
    sink: Arc<dyn EventSink>,
    out: &std::path::Path,
    today: NaiveDate,
) -> Result<(), AppError> {
    let (session, _) = open_session(config, sink, today)?;
    let snapshot = session.snapshot();
    let bundle = snapshot.full_report_on(today);
    crate::io::write_report_json(out, &bundle)?;
    info!(source = snapshot.source(), path = %out.display(), "report exported");
    println!("Wrote report for {} record(s) -> {}", bundle.summary.total_orders, out.display());
    Ok(())
}

fn handle_regenerate(config: AppConfig, sink: Arc<dyn EventSink>, today: NaiveDate) -> Result<(), AppError> {
    let (session, summary) = match Session::open(config.clone(), sink.clone()) {
        Ok(mut session) => {
            let summary = session.regenerate(today)?;
            (session, summary)
        }
        Err(err) => {
            // Regenerating is also how a broken data file gets replaced.
            warn!(error = %err, "current data unusable, writing fresh data");
            let summary = generate_fixture(&config.data.path, &GeneratorConfig::from(&config.data), today)?;
            (Session::open(config, sink)?, summary)
        }
    };

    println!("{}", report::format_generation(&summary, session.data_path()));
    print!("{}", render_view(ReportView::Dashboard, &session.snapshot(), session.config(), today));
    Ok(())
}

fn open_session(
    config: AppConfig,
    sink: Arc<dyn EventSink>,
    today: NaiveDate,
) -> Result<(Session, Option<GenerationSummary>), AppError> {
    if config.data.auto_generate {
        Session::open_or_generate(config, sink, today)
    } else {
        Ok((Session::open(config, sink)?, None))
    }
}

/// Render one report view for a snapshot.
pub fn render_view(view: ReportView, analyzer: &SalesAnalyzer, config: &AppConfig, today: NaiveDate) -> String {
    match view {
        ReportView::Dashboard => report::format_dashboard(&analyzer.full_report_on(today), config),
        ReportView::Summary => report::format_summary(&analyzer.summary_stats_on(today)),
        ReportView::Categories => report::format_rollup("Sales by category", &analyzer.sales_by_category()),
        ReportView::Products => report::format_rollup(
            &format!("Top {} products", analyzer.config().top_n),
            &analyzer.top_products_default(),
        ),
        ReportView::Regions => report::format_rollup("Sales by region", &analyzer.regional_analysis()),
        ReportView::Trend => report::format_trend(&analyzer.sales_trend_analysis()),
        ReportView::Customers => report::format_customers(&analyzer.customer_analysis()),
        ReportView::Performance => report::format_product_performance(&analyzer.product_performance_metrics()),
        ReportView::Forecast => report::format_forecast(&analyzer.predictive_insights()),
        ReportView::About => report::format_about(config),
    }
}
