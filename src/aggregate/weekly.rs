// src/aggregate/weekly.rs
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use crate::aggregate::daily::mean;
use crate::met::models::{format_number, format_sheet_date, parse_sheet_date, round2};
use crate::met::{Variable, Zone};
use crate::storage::sheet::{Record, Sheet, DATE_COLUMN, VARIABLE_COLUMN};

/// `Variable` column value of the appended summary row.
pub const WEEKLY_LABEL: &str = "8-day Average";

pub fn weekly_column(zone: Zone) -> String {
    format!("8-Day Average {}", zone.name())
}

/// Days covered by a weekly summary: the seven days before the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyWindow {
    pub anchor: NaiveDate,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeeklyWindow {
    pub fn ending_before(anchor: NaiveDate) -> Self {
        Self {
            anchor,
            start: anchor - Duration::days(7),
            end: anchor - Duration::days(1),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

pub fn is_anchor_day(date: NaiveDate, anchor: Weekday) -> bool {
    date.weekday() == anchor
}

/// Zone averages of the per-station window means, or `None` when the sheet
/// has no daily rows of `variable` inside the window.
pub fn weekly_zone_averages(sheet: &Sheet, variable: Variable, window: &WeeklyWindow) -> Option<Vec<(Zone, Option<f64>)>> {
    let rows: Vec<_> = sheet
        .rows_for(variable.label())
        .filter(|row| {
            row.get(DATE_COLUMN)
                .and_then(parse_sheet_date)
                .map(|d| window.contains(d))
                .unwrap_or(false)
        })
        .collect();

    if rows.is_empty() {
        return None;
    }
    tracing::debug!("{} {} rows fall in {} - {}", rows.len(), variable, window.start, window.end);

    let averages = Zone::ALL
        .iter()
        .map(|zone| {
            let station_means: Vec<f64> = zone
                .stations()
                .iter()
                .filter_map(|station| {
                    let values: Vec<f64> = rows
                        .iter()
                        .filter_map(|row| row.get(station))
                        .filter_map(|cell| cell.trim().parse::<f64>().ok())
                        .filter(|v| v.is_finite())
                        .collect();
                    mean(&values)
                })
                .collect();
            (*zone, mean(&station_means).map(round2))
        })
        .collect();

    Some(averages)
}

pub fn weekly_record(window: &WeeklyWindow, averages: &[(Zone, Option<f64>)]) -> Record {
    let mut record = vec![
        (DATE_COLUMN.to_string(), format_sheet_date(window.anchor)),
        (VARIABLE_COLUMN.to_string(), WEEKLY_LABEL.to_string()),
    ];
    record.extend(averages.iter().map(|(zone, avg)| {
        (weekly_column(*zone), avg.map(format_number).unwrap_or_default())
    }));
    record
}

/// Adds (or refreshes) the weekly summary row for `anchor` in a variable's sheet.
/// Returns the row written, or `None` when the window holds no data.
pub fn apply_weekly(sheet: &mut Sheet, variable: Variable, anchor: NaiveDate) -> Option<Record> {
    let window = WeeklyWindow::ending_before(anchor);

    let Some(averages) = weekly_zone_averages(sheet, variable, &window) else {
        tracing::info!(
            "No {} data found for the period from {} to {}.",
            variable, format_sheet_date(window.start), format_sheet_date(window.end)
        );
        return None;
    };

    let record = weekly_record(&window, &averages);
    sheet.upsert(&record);
    tracing::info!(
        "Weekly {} averages for {} to {} calculated.",
        variable, format_sheet_date(window.start), format_sheet_date(window.end)
    );
    Some(record)
}
