//! Climate CLI
//!
//! Web server runner and archive inspection tool.

use anyhow::{ensure, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use climate_api::{create_router, ApiConfig, AppState, DEFAULT_STATION};
use climate_database::{Database, ObservationWindow};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "climate")]
#[command(about = "Climate App - read-only API over station measurements")]
#[command(version)]
struct Cli {
    /// Database file path
    #[arg(
        short,
        long,
        env = "CLIMATE_DATABASE",
        default_value = "Resources/hawaii.sqlite"
    )]
    database: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Address to bind to
        #[arg(short, long, default_value = "127.0.0.1:5000")]
        bind: SocketAddr,

        /// First day of the precipitation and tobs window
        #[arg(long, default_value = "2016-08-23")]
        window_start: NaiveDate,

        /// Last day of the precipitation and tobs window
        #[arg(long, default_value = "2017-08-23")]
        window_end: NaiveDate,

        /// Station reported by the tobs route
        #[arg(long, default_value = DEFAULT_STATION)]
        station: String,
    },

    /// List station metadata
    List,

    /// Show stations ranked by number of measurements
    Stations,

    /// Show per-date temperature summaries
    Summary {
        /// First date (YYYY-MM-DD)
        start: String,

        /// Last date, inclusive (YYYY-MM-DD)
        end: Option<String>,
    },

    /// Show the latest measurements of a station
    History {
        /// Station identifier
        station: String,

        /// Number of measurements to show
        #[arg(short, long, default_value_t = 10)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    // Connect to database
    let db = Database::connect(&cli.database).await?;

    match cli.command {
        Commands::Serve {
            bind,
            window_start,
            window_end,
            station,
        } => {
            ensure!(
                window_start <= window_end,
                "window start {} is after window end {}",
                window_start,
                window_end
            );
            let config = ApiConfig {
                window: ObservationWindow::new(window_start, window_end),
                station,
            };
            serve(db, bind, config).await?;
        }
        Commands::List => {
            list(&db).await?;
        }
        Commands::Stations => {
            stations(&db).await?;
        }
        Commands::Summary { start, end } => {
            summary(&db, &start, end.as_deref()).await?;
        }
        Commands::History { station, limit } => {
            history(&db, &station, limit).await?;
        }
    }

    Ok(())
}

async fn serve(db: Database, bind: SocketAddr, config: ApiConfig) -> Result<()> {
    let (start, end) = config.window.bounds();
    info!("Observation window {} to {}, station {}", start, end, config.station);

    let state = Arc::new(AppState::with_config(db, config));
    let router = create_router(state);

    info!("Starting Climate API server on {}", bind);
    info!("API available at http://{}/api/v1.0", bind);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

async fn list(db: &Database) -> Result<()> {
    let stations = db.get_stations().await?;

    println!(
        "{:<12} {:<40} {:>9} {:>10} {:>7}",
        "STATION", "NAME", "LAT", "LON", "ELEV"
    );
    println!("{}", "-".repeat(82));

    for s in stations {
        println!(
            "{:<12} {:<40} {:>9} {:>10} {:>7}",
            s.station,
            s.name,
            format_reading(s.latitude),
            format_reading(s.longitude),
            format_reading(s.elevation)
        );
    }

    Ok(())
}

async fn stations(db: &Database) -> Result<()> {
    let ranking = db.get_station_activity().await?;

    println!("{:<5} {:<12} {:<8}", "RANK", "STATION", "COUNT");
    println!("{}", "-".repeat(27));

    for (idx, activity) in ranking.iter().enumerate() {
        println!(
            "{:<5} {:<12} {:<8}",
            idx + 1,
            activity.station,
            activity.observations
        );
    }

    if ranking.is_empty() {
        println!("No measurements recorded.");
    }

    Ok(())
}

async fn summary(db: &Database, start: &str, end: Option<&str>) -> Result<()> {
    let rows = db.get_temperature_summaries(start, end).await?;

    println!("{:<12} {:>7} {:>7} {:>7}", "DATE", "MIN", "MAX", "AVG");
    println!("{}", "-".repeat(36));

    for row in &rows {
        println!(
            "{:<12} {:>7} {:>7} {:>7}",
            row.date,
            format_reading(row.min_tobs),
            format_reading(row.max_tobs),
            format_reading(row.avg_tobs)
        );
    }

    if rows.is_empty() {
        println!("No measurements from {}.", start);
    }

    Ok(())
}

async fn history(db: &Database, station: &str, limit: i64) -> Result<()> {
    let measurements = db.get_recent_measurements(station, limit).await?;

    println!("Station: {}", station);
    println!("{:<12} {:>7} {:>7}", "DATE", "PRCP", "TOBS");
    println!("{}", "-".repeat(28));

    for m in &measurements {
        println!(
            "{:<12} {:>7} {:>7}",
            m.date,
            format_reading(m.prcp),
            format_reading(m.tobs)
        );
    }

    if measurements.is_empty() {
        println!("No measurements recorded.");
    }

    Ok(())
}

fn format_reading(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}
