// src/main.rs
mod aggregate;
mod bulletin;
mod charts;
mod config;
mod extractors;
mod jobs;
mod met;
mod storage;
mod utils;

use std::path::PathBuf;
use chrono::{Local, NaiveDate, Weekday};
use clap::{Parser, Subcommand};
use utils::AppError;
use bulletin::DEFAULT_HOMEPAGE_URL;
use charts::ChartKind;
use config::{AppConfig, ColumnLayout};
use met::Variable;
use storage::StorageManager;

/// Daily climate bulletin downloader and station data extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base directory for bulletins, sheets and charts
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,

    /// Run date as YYYY-MM-DD (default: today)
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    /// Met department home page that links the daily bulletin
    #[arg(long, global = true, default_value = DEFAULT_HOMEPAGE_URL)]
    url: String,

    /// Value written for stations without a reading
    #[arg(long, global = true, default_value = "0.0")]
    placeholder: f64,

    /// Debug mode - save annotated bulletin text and log at debug level
    #[arg(short, long, global = true)]
    debug: bool,

    /// Read bulletin text from this file instead of the stored PDF
    #[arg(long, global = true)]
    from_text: Option<PathBuf>,

    /// Table column holding the maximum temperature
    #[arg(long, global = true, default_value = "1")]
    tmax_col: usize,

    /// Table column holding the minimum temperature
    #[arg(long, global = true, default_value = "2")]
    tmin_col: usize,

    /// Table column holding the rainfall
    #[arg(long, global = true, default_value = "3")]
    rain_col: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download the daily bulletin PDF
    Fetch {
        /// Download again even if the bulletin is already stored
        #[arg(long)]
        force: bool,
    },
    /// Write raw Tmax, Tmin and Rainfall cells to the combined sheet
    Extract,
    /// Write one variable's daily row with statistics and zone averages
    Daily {
        #[arg(value_enum)]
        variable: Variable,
    },
    /// Write the hydro catchment rainfall row
    Hydro,
    /// Add the 8-day zone averages for the week before the anchor date
    Weekly {
        #[arg(value_enum)]
        variable: Variable,

        /// Anchor date (default: run date)
        #[arg(long)]
        anchor: Option<NaiveDate>,
    },
    /// Render a chart over the last 30 days
    Chart {
        #[arg(value_enum)]
        kind: ChartKind,
    },
    /// Fetch, extract everything and apply the weekly rule
    Run {
        /// Also render every chart
        #[arg(long)]
        charts: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Parse CLI Arguments
    let args = Args::parse();

    // 2. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging(args.debug);
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Build configuration
    let cfg = AppConfig {
        data_dir: args.data_dir.clone(),
        homepage_url: args.url.clone(),
        run_date: args.date.unwrap_or_else(|| Local::now().date_naive()),
        placeholder: args.placeholder,
        layout: ColumnLayout { tmax: args.tmax_col, tmin: args.tmin_col, rainfall: args.rain_col },
        weekly_anchor: Weekday::Thu,
        debug: args.debug,
    };
    if [cfg.layout.tmax, cfg.layout.tmin, cfg.layout.rainfall].contains(&0) {
        return Err(AppError::Config("Column 0 holds the station name; data columns start at 1".to_string()));
    }
    tracing::debug!("Using configuration: {:?}", cfg);

    // 4. Initialize storage
    let storage = StorageManager::new(&cfg.data_dir)?;
    let text_file = args.from_text.as_deref();

    // 5. Dispatch
    match args.command {
        Command::Fetch { force } => {
            let path = jobs::fetch(&cfg, &storage, force).await?;
            tracing::info!("Bulletin available at: {}", path.display());
        }
        Command::Extract => {
            let text = jobs::load_text(&cfg, &storage, text_file);
            let table = jobs::parse_table(text.as_deref(), &cfg.layout);
            let path = jobs::extract_combined(&cfg, &storage, table.as_ref())?;
            tracing::info!("Combined sheet written to: {}", path.display());
        }
        Command::Daily { variable } => {
            if variable == Variable::HydroRainfall {
                return Err(AppError::Config("Use the hydro command for catchment rainfall".to_string()));
            }
            let text = jobs::load_text(&cfg, &storage, text_file);
            let table = jobs::parse_table(text.as_deref(), &cfg.layout);
            let record = jobs::extract_daily(&cfg, &storage, variable, table.as_ref())?;
            tracing::info!("{} row for {} written", variable, record.date);
            jobs::weekly_if_due(&cfg, &storage)?;
        }
        Command::Hydro => {
            let text = jobs::load_text(&cfg, &storage, text_file);
            let record = jobs::extract_hydro(&cfg, &storage, text.as_deref())?;
            tracing::info!("Hydro catchment row for {} written", record.date);
        }
        Command::Weekly { variable, anchor } => {
            let anchor = anchor.unwrap_or(cfg.run_date);
            if jobs::weekly(&storage, variable, anchor)?.is_none() {
                tracing::warn!("No weekly row written for {} at {}", variable, anchor);
            }
        }
        Command::Chart { kind } => {
            let path = jobs::chart(&cfg, &storage, kind, Local::now())?;
            tracing::info!("Chart saved to: {}", path.display());
        }
        Command::Run { charts } => {
            jobs::run(&cfg, &storage, text_file, charts).await?;
        }
    }

    Ok(())
}
