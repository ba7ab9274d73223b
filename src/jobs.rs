// src/jobs.rs
use std::path::{Path, PathBuf};
use chrono::{DateTime, Local, NaiveDate};
use crate::aggregate::{apply_weekly, is_anchor_day};
use crate::bulletin::client;
use crate::charts::{self, Accumulation, ChartKind, CHART_WINDOW_DAYS};
use crate::config::{AppConfig, ColumnLayout};
use crate::extractors::table::{HYDRO_MATCHER, MET_MATCHER};
use crate::extractors::{
    combined_records, DailyRecord, HydroRecord, PdfBulletin, PlainText, StationTable, TextSource, COMBINED_SHEET,
};
use crate::met::Variable;
use crate::storage::{Record, StorageManager};
use crate::utils::error::{AppError, ChartError, ExtractError};
use crate::utils::text_debug;

/// The station table and hydro lines are on the first page.
const BULLETIN_PAGE: usize = 0;

/// Downloads the bulletin for the run date unless it is already on disk.
pub async fn fetch(cfg: &AppConfig, storage: &StorageManager, force: bool) -> Result<PathBuf, AppError> {
    let path = storage.bulletin_path(cfg.run_date);
    if path.exists() && !force {
        tracing::info!("Bulletin for {} already downloaded: {}", cfg.run_date, path.display());
        if let Some(info) = storage.bulletin_info(cfg.run_date)? {
            tracing::debug!("Downloaded from {} at {}", info.source_url, info.downloaded_at);
        }
        return Ok(path);
    }

    let (bytes, info) = client::fetch_daily_bulletin(&cfg.homepage_url, cfg.run_date).await?;
    tracing::info!("Downloaded {} bytes from {}", info.size_bytes, info.source_url);
    Ok(storage.save_bulletin(&bytes, &info)?)
}

/// Text of the bulletin page holding the tables. `text_file` replaces the
/// stored PDF when given. `None` means no usable bulletin; callers then write
/// placeholder rows.
pub fn load_text(cfg: &AppConfig, storage: &StorageManager, text_file: Option<&Path>) -> Option<String> {
    let source: Result<Box<dyn TextSource>, ExtractError> = match text_file {
        Some(path) => PlainText::read(path).map(|t| Box::new(t) as Box<dyn TextSource>),
        None => PdfBulletin::open(storage.bulletin_path(cfg.run_date)).map(|p| Box::new(p) as Box<dyn TextSource>),
    };

    match source.and_then(|s| s.page_text(BULLETIN_PAGE)) {
        Ok(text) => {
            tracing::debug!("Read {} characters of bulletin text", text.len());
            if cfg.debug {
                if let Err(e) = write_debug_text(cfg, storage, &text) {
                    tracing::warn!("Failed to create debug text: {}", e);
                }
            }
            Some(text)
        }
        Err(ExtractError::PdfMissing(path)) => {
            tracing::warn!("No bulletin at {}; writing placeholder rows", path);
            None
        }
        Err(e) => {
            tracing::error!("Failed to read bulletin text: {}", e);
            None
        }
    }
}

fn write_debug_text(cfg: &AppConfig, storage: &StorageManager, text: &str) -> Result<(), AppError> {
    let patterns = vec![
        (MET_MATCHER.pattern().to_string(), "station"),
        (HYDRO_MATCHER.pattern().to_string(), "hydro"),
        (r"\b(?:NA|N/A)\b".to_string(), "missing"),
    ];
    let path = storage.debug_path(cfg.run_date)?;
    text_debug::create_debug_text(text, &path, &patterns)
}

/// Station table from the bulletin text, if one can be found.
pub fn parse_table(text: Option<&str>, layout: &ColumnLayout) -> Option<StationTable> {
    match StationTable::parse(text?, layout) {
        Ok(table) => {
            tracing::info!("Found {} station rows in bulletin", table.len());
            Some(table)
        }
        Err(e) => {
            tracing::error!("{}", e);
            None
        }
    }
}

/// Writes the raw Tmax, Tmin and Rainfall cells to the combined sheet.
pub fn extract_combined(cfg: &AppConfig, storage: &StorageManager, table: Option<&StationTable>) -> Result<PathBuf, AppError> {
    let records = combined_records(table, cfg.run_date, &cfg.layout);
    Ok(storage.upsert_records(COMBINED_SHEET, &records)?)
}

/// Writes one variable's daily row, with statistics and zone averages, to
/// its sheet. Missing stations get the configured placeholder.
pub fn extract_daily(
    cfg: &AppConfig,
    storage: &StorageManager,
    variable: Variable,
    table: Option<&StationTable>,
) -> Result<DailyRecord, AppError> {
    let date = cfg.observation_date(variable);
    let record = match table {
        Some(table) => DailyRecord::from_table(table, variable, date, &cfg.layout),
        None => DailyRecord::placeholder(variable, date),
    };

    let missing = record.missing_stations();
    if !missing.is_empty() {
        tracing::warn!(
            "{} of {} stations without a {} reading; using {}: {}",
            missing.len(), record.readings.len(), variable, cfg.placeholder, missing.join(", ")
        );
    }

    storage.upsert_records(variable.sheet_name(), &[record.to_record(cfg.placeholder)])?;
    Ok(record)
}

/// Writes the hydro catchment rainfall row.
pub fn extract_hydro(cfg: &AppConfig, storage: &StorageManager, text: Option<&str>) -> Result<HydroRecord, AppError> {
    let date = cfg.observation_date(Variable::HydroRainfall);
    let record = match text {
        Some(text) => HydroRecord::from_text(text, date),
        None => HydroRecord::placeholder(date),
    };
    storage.upsert_records(Variable::HydroRainfall.sheet_name(), &[record.to_record()])?;
    Ok(record)
}

/// Adds the 8-day zone averages ending the day before `anchor` to a variable's sheet.
pub fn weekly(storage: &StorageManager, variable: Variable, anchor: NaiveDate) -> Result<Option<Record>, AppError> {
    let mut sheet = storage.load_sheet(variable.sheet_name())?;
    let written = apply_weekly(&mut sheet, variable, anchor);
    if written.is_some() {
        storage.save_sheet(variable.sheet_name(), &sheet)?;
    }
    Ok(written)
}

/// Applies the weekly rule to every met variable when the run date is the anchor weekday.
pub fn weekly_if_due(cfg: &AppConfig, storage: &StorageManager) -> Result<usize, AppError> {
    if !is_anchor_day(cfg.run_date, cfg.weekly_anchor) {
        tracing::debug!("{} is not a {:?}; skipping weekly averages", cfg.run_date, cfg.weekly_anchor);
        return Ok(0);
    }
    let mut written = 0;
    for variable in Variable::MET {
        if weekly(storage, variable, cfg.run_date)?.is_some() {
            written += 1;
        }
    }
    Ok(written)
}

/// Renders one chart over the last 30 days of data.
pub fn chart(cfg: &AppConfig, storage: &StorageManager, kind: ChartKind, now: DateTime<Local>) -> Result<PathBuf, AppError> {
    let variable = kind.variable();
    let sheet = storage.load_sheet(variable.sheet_name())?;
    let column = variable.average_column();
    let points = charts::daily_series(&sheet, variable, &column, cfg.run_date, CHART_WINDOW_DAYS);
    if points.is_empty() {
        return Err(ChartError::NoData(column, CHART_WINDOW_DAYS).into());
    }

    let path = storage.chart_path(variable.chart_dir(), &kind.file_name(now))?;
    match kind {
        ChartKind::Accumulated => {
            let acc = Accumulation::from_daily(&points).ok_or(ChartError::NoData(column, CHART_WINDOW_DAYS))?;
            charts::render_accumulated(&acc, &path)?;
        }
        _ => charts::render_daily_average(&points, variable, &path)?,
    }
    tracing::info!("Saved {:?} chart ({} days) to {}", kind, points.len(), path.display());
    Ok(path)
}

/// Full daily run: download, every extractor, the weekly rule and
/// optionally the charts. Steps that fail are logged and counted; the run
/// fails only if nothing succeeded.
pub async fn run(
    cfg: &AppConfig,
    storage: &StorageManager,
    text_file: Option<&Path>,
    with_charts: bool,
) -> Result<(), AppError> {
    let mut success_count = 0;
    let mut failure_count = 0;

    if text_file.is_none() {
        match fetch(cfg, storage, false).await {
            Ok(path) => tracing::info!("Bulletin ready at {}", path.display()),
            Err(e) => {
                tracing::error!("Failed to download bulletin: {}", e);
                failure_count += 1;
            }
        }
    }

    let text = load_text(cfg, storage, text_file);
    let table = parse_table(text.as_deref(), &cfg.layout);

    let mut tally = |step: &str, result: Result<(), AppError>| match result {
        Ok(()) => success_count += 1,
        Err(e) => {
            tracing::error!("{} failed: {}", step, e);
            failure_count += 1;
        }
    };

    tally("Combined extraction", extract_combined(cfg, storage, table.as_ref()).map(|_| ()));
    for variable in Variable::MET {
        tally(variable.label(), extract_daily(cfg, storage, variable, table.as_ref()).map(|_| ()));
    }
    tally("Hydro extraction", extract_hydro(cfg, storage, text.as_deref()).map(|_| ()));
    tally("Weekly averages", weekly_if_due(cfg, storage).map(|_| ()));

    if with_charts {
        let now = Local::now();
        for kind in ChartKind::ALL {
            tally("Chart", chart(cfg, storage, kind, now).map(|_| ()));
        }
    }

    tracing::info!("Processing finished. Success: {}, Failures: {}", success_count, failure_count);

    if success_count == 0 && failure_count > 0 {
        return Err(AppError::Processing(format!("All {} steps failed for {}", failure_count, cfg.run_date)));
    }
    Ok(())
}
