//! CLI entry point for the flight delay statistics tool.
//!
//! Provides subcommands for building the static JSON report, the filterable
//! interactive summaries, exporting a filtered working set, and listing the
//! available filter choices.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use flight_delay_stats::{
    config::EngineConfig,
    engine::filter::{FilterOptions, FilterSpec},
    engine::report::{WorkingSet, assemble_report, dashboard_from},
    engine::types::Dashboard,
    error::LoadError,
    output::{emit_json, export_csv, print_pretty},
    record::{FlightRecord, load_flights},
};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "flight_delay_stats")]
#[command(about = "Delay statistics over historical flight records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DataArgs {
    /// CSV dataset (optionally .gz) with AIRLINE, ORIGIN_AIRPORT, ... columns
    #[arg(
        short,
        long,
        env = "FLIGHTS_DATA_PATH",
        default_value = "data/processed/flights_sample.csv"
    )]
    data: PathBuf,
}

#[derive(Args)]
struct FilterArgs {
    /// Keep only these airlines (repeatable; none = all)
    #[arg(long = "airline", value_name = "CODE")]
    airlines: Vec<String>,

    /// Keep only flights leaving these airports (repeatable; none = all)
    #[arg(long = "origin", value_name = "CODE")]
    origins: Vec<String>,

    /// First month to include
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=12))]
    min_month: u8,

    /// Last month to include
    #[arg(long, default_value_t = 12, value_parser = clap::value_parser!(u8).range(1..=12))]
    max_month: u8,
}

impl FilterArgs {
    fn to_spec(&self) -> FilterSpec {
        FilterSpec::default()
            .with_airlines(self.airlines.iter().cloned())
            .with_origin_airports(self.origins.iter().cloned())
            .with_month_range(self.min_month, self.max_month)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the static JSON report
    Report {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// JSON config file with volume floors and ranking sizes
        #[arg(short, long, env = "FLIGHTS_CONFIG_PATH")]
        config: Option<PathBuf>,

        /// File to write the report to (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build the filterable summaries behind the interactive view
    Summary {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// JSON config file with volume floors and ranking sizes
        #[arg(short, long, env = "FLIGHTS_CONFIG_PATH")]
        config: Option<PathBuf>,

        /// File to write the summaries to (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export the filtered working set as CSV
    Export {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// CSV file to write
        #[arg(short, long, default_value = "filtered_flight_data.csv")]
        output: PathBuf,

        /// Gzip compress the CSV
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// List the airlines, airports and months available for filtering
    Options {
        #[command(flatten)]
        data: DataArgs,
    },
}

/// Summaries plus the context they were computed in.
#[derive(Serialize)]
struct SummaryEnvelope<'a> {
    generated_at: DateTime<Utc>,
    filter: &'a FilterSpec,
    options: FilterOptions,
    #[serde(flatten)]
    dashboard: Dashboard,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/flight_delay_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("flight_delay_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "info"));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", "debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<LoadError>() {
            Some(load_error) => {
                error!(error = %load_error, "Flight data unavailable; nothing to report");
                ExitCode::from(2)
            }
            None => {
                error!(error = %format!("{e:#}"), "Command failed");
                ExitCode::FAILURE
            }
        },
    }
}

/// Reads `var` as a filter directive, falling back to `default` when it is
/// unset or invalid.
fn env_filter(var: &str, default: &str) -> EnvFilter {
    EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::new(default))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Report {
            data,
            filter,
            config,
            output,
        } => {
            let config = EngineConfig::load_or_default(config.as_deref())?;
            let records = load_records(&data.data)?;
            let spec = filter.to_spec();

            let report = assemble_report(&records, Some(&spec), &config.report);
            emit_json(output.as_deref(), &report)?;
        }
        Commands::Summary {
            data,
            filter,
            config,
            output,
        } => {
            let config = EngineConfig::load_or_default(config.as_deref())?;
            let records = load_records(&data.data)?;
            let spec = filter.to_spec();

            let working = WorkingSet::build(&records, Some(&spec));
            let envelope = SummaryEnvelope {
                generated_at: Utc::now(),
                filter: &spec,
                options: FilterOptions::from_records(&records),
                dashboard: dashboard_from(&working, &config.dashboard),
            };
            print_pretty(&envelope.dashboard.kpis);
            emit_json(output.as_deref(), &envelope)?;
        }
        Commands::Export {
            data,
            filter,
            output,
            gzip,
        } => {
            let records = load_records(&data.data)?;
            let working = WorkingSet::build(&records, Some(&filter.to_spec()));

            if working.is_empty() {
                info!("No flights match the filter; writing header only");
            }
            export_csv(&output, working.flights(), gzip)?;
        }
        Commands::Options { data } => {
            let records = load_records(&data.data)?;
            let options = FilterOptions::from_records(&records);

            info!(
                airlines = options.airlines.len(),
                origin_airports = options.origin_airports.len(),
                "Filter options"
            );
            info!(airlines = %options.airlines.join(", "), "Airlines");
            info!(origin_airports = %options.origin_airports.join(", "), "Origin airports");
            if let Some((min_month, max_month)) = options.month_range {
                info!(min_month, max_month, "Operating months");
            }
        }
    }

    Ok(())
}

/// Loads the dataset, keeping [`LoadError`] intact so `main` can tell missing
/// data apart from other failures.
fn load_records(path: &Path) -> Result<Vec<FlightRecord>> {
    let loaded = load_flights(path)?;
    if loaded.rejected_rows > 0 {
        info!(rejected = loaded.rejected_rows, "Some rows were skipped");
    }
    Ok(loaded.records)
}
