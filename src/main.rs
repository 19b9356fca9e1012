//! CLI entry point for the bike trip and weather report tool.
//!
//! Loads a bike-share trip export and an hourly weather export, then runs the
//! fixed battery of reports over them.

use anyhow::Result;
use bike_weather_stats::{
    dataset::Dataset,
    output::{OutputFormat, render_all},
    parser::{TimestampPolicy, load_trips, load_weather},
    queries::{runner::run_all, utility::mean},
};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bike_weather_stats")]
#[command(about = "Descriptive statistics joining bike-share trips with hourly weather", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Inputs {
    /// Trip CSV export (optionally .gz)
    #[arg(long, env = "BIKE_TRIPS_PATH")]
    trips: PathBuf,

    /// Hourly weather CSV export (optionally .gz)
    #[arg(long, env = "BIKE_WEATHER_PATH")]
    weather: PathBuf,

    /// How to handle rows with an unparseable timestamp
    #[arg(long, value_enum, default_value_t = TimestampPolicy::Fail)]
    on_bad_timestamp: TimestampPolicy,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every report and print the results
    Report {
        #[command(flatten)]
        inputs: Inputs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Directory for CSV output
        #[arg(short, long, default_value = "reports")]
        output_dir: PathBuf,
    },
    /// Print the first parsed trip and weather records
    Sample {
        #[command(flatten)]
        inputs: Inputs,

        /// Number of records of each kind to print
        #[arg(short = 'n', long, default_value_t = 3)]
        count: usize,
    },
    /// Log dataset size, trip date range and daytime window coverage
    Summary {
        #[command(flatten)]
        inputs: Inputs,
    },
}

/// Colored stderr plus a JSON rolling log file.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bike_weather_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bike_weather_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(guard)
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _log_guard = init_tracing()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            inputs,
            format,
            output_dir,
        } => {
            let db = Dataset::load(&inputs.trips, &inputs.weather, inputs.on_bad_timestamp)?;
            let reports = run_all(&db);

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            writeln!(out, "=== CITYBIKE DATA ANALYSIS ===\n")?;
            render_all(&mut out, &reports, format, &output_dir)?;
        }
        Commands::Sample { inputs, count } => {
            let trips = load_trips(&inputs.trips, inputs.on_bad_timestamp)?;
            let weather = load_weather(&inputs.weather, inputs.on_bad_timestamp)?;

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for trip in trips.iter().take(count) {
                writeln!(out, "{trip}")?;
            }
            for observation in weather.iter().take(count) {
                writeln!(out, "{observation}")?;
            }
        }
        Commands::Summary { inputs } => {
            let db = Dataset::load(&inputs.trips, &inputs.weather, inputs.on_bad_timestamp)?;
            let durations: Vec<f64> = db.trips.iter().map(|t| t.duration_minutes()).collect();

            match db.trip_start_range() {
                Ok((first, last)) => {
                    let window_hours = db.daytime_window()?.len();
                    info!(
                        trips = db.trips.len(),
                        weather = db.weather.len(),
                        first_start = %first,
                        last_start = %last,
                        distinct_dates = db.distinct_trip_dates(),
                        window_hours,
                        avg_duration_minutes = mean(&durations),
                        "Dataset summary"
                    );
                }
                Err(e) => warn!(weather = db.weather.len(), error = %e, "Dataset has no trips"),
            }
        }
    }

    Ok(())
}
