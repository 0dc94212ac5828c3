//! CLI entry point for the ride dashboard tool.
//!
//! Provides subcommands for analyzing a trip payload under the current
//! filters, listing the selectable filter options, and exporting the
//! filtered trips table as CSV.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ride_dashboard::{
    dashboard::Dashboard,
    fetch::BasicClient,
    filter::FilterDimension,
    output::{LogRenderer, print_json, write_table_csv},
    projection,
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "ride_dashboard")]
#[command(about = "A tool to explore and aggregate ride trip data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Default)]
struct FilterArgs {
    /// Keep only trips with this vendor id
    #[arg(long)]
    vendor: Option<String>,

    /// Keep only trips with this passenger count
    #[arg(long)]
    passengers: Option<String>,

    /// Keep only trips picked up in this month (e.g. "March")
    #[arg(long)]
    month: Option<String>,

    /// Keep only trips picked up on this weekday (e.g. "Monday")
    #[arg(long)]
    weekday: Option<String>,

    /// Keep only trips in this distance category (short/medium/long)
    #[arg(long)]
    category: Option<String>,

    /// Inclusive pickup lower bound, YYYY-MM-DD or "YYYY-MM-DD HH:MM:SS"
    #[arg(long)]
    start_date: Option<String>,

    /// Inclusive pickup upper bound, YYYY-MM-DD or "YYYY-MM-DD HH:MM:SS"
    #[arg(long)]
    end_date: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a trip payload, apply filters, and print the aggregate stats
    Analyze {
        /// Path to a JSON file or URL to fetch; defaults to $TRIPS_API_URL
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Print the selectable filter options derived from a trip payload
    Options {
        /// Path to a JSON file or URL to fetch; defaults to $TRIPS_API_URL
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,
    },
    /// Export the filtered trips table as CSV
    Export {
        /// Path to a JSON file or URL to fetch; defaults to $TRIPS_API_URL
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,

        /// CSV file to write
        #[arg(short, long, default_value = "trips.csv")]
        output: String,

        /// Sort rows ascending by trip duration
        #[arg(long, default_value_t = false)]
        sort_duration: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/ride_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ride_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { source, filters } => {
            let dashboard = load_dashboard(source, &filters).await?;

            info!(
                total = dashboard.records().len(),
                filtered = dashboard.filtered().len(),
                "Analysis ready"
            );
            print_json(dashboard.stats())?;

            let mut charts = LogRenderer::default();
            let mut map = LogRenderer::default();
            dashboard.render(&mut charts, &mut map);
        }
        Commands::Options { source } => {
            let dashboard = load_dashboard(source, &FilterArgs::default()).await?;
            print_json(&projection::filter_options(dashboard.catalog()))?;
        }
        Commands::Export {
            source,
            filters,
            output,
            sort_duration,
        } => {
            let dashboard = load_dashboard(source, &filters).await?;

            let rows = if sort_duration {
                projection::table_rows_by_duration(dashboard.filtered())
            } else {
                dashboard.table()
            };

            write_table_csv(&output, &rows)?;
            info!(rows = rows.len(), output = %output, "Exported trips table");
        }
    }

    Ok(())
}

impl FilterArgs {
    fn entries(&self) -> Vec<(FilterDimension, &String)> {
        [
            (FilterDimension::Vendor, &self.vendor),
            (FilterDimension::PassengerCount, &self.passengers),
            (FilterDimension::Month, &self.month),
            (FilterDimension::Weekday, &self.weekday),
            (FilterDimension::DistanceCategory, &self.category),
            (FilterDimension::StartDate, &self.start_date),
            (FilterDimension::EndDate, &self.end_date),
        ]
        .into_iter()
        .filter_map(|(dimension, value)| value.as_ref().map(|v| (dimension, v)))
        .collect()
    }
}

/// Loads trip data from a local file path or URL (or `$TRIPS_API_URL`) and
/// applies every filter flag that was given.
#[tracing::instrument(skip(filters))]
async fn load_dashboard(source: Option<String>, filters: &FilterArgs) -> Result<Dashboard> {
    let source = source
        .or_else(|| std::env::var("TRIPS_API_URL").ok())
        .context("no source given and TRIPS_API_URL is not set")?;

    let mut dashboard = Dashboard::new();

    if source.starts_with("http") {
        let client = BasicClient::new()?;
        dashboard.load_from_url(&client, &source).await?;
    } else {
        let bytes =
            std::fs::read(&source).with_context(|| format!("failed to read {source}"))?;
        dashboard
            .load_from_bytes(&bytes)
            .with_context(|| format!("failed to load trips from {source}"))?;
    }

    for (dimension, value) in filters.entries() {
        dashboard.set_filter(dimension, value)?;
    }

    Ok(dashboard)
}
