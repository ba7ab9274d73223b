// src/config.rs
use std::path::PathBuf;
use chrono::{Duration, NaiveDate, Weekday};
use crate::met::Variable;

/// Column of each variable in a station row; column 0 is the station name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub tmax: usize,
    pub tmin: usize,
    pub rainfall: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self { tmax: 1, tmin: 2, rainfall: 3 }
    }
}

impl ColumnLayout {
    pub fn column(&self, variable: Variable) -> Option<usize> {
        match variable {
            Variable::Tmax => Some(self.tmax),
            Variable::Tmin => Some(self.tmin),
            Variable::Rainfall => Some(self.rainfall),
            Variable::HydroRainfall => None,
        }
    }

    /// Value cells a row needs for every variable to be placed.
    pub fn width(&self) -> usize {
        self.tmax.max(self.tmin).max(self.rainfall)
    }
}

/// Settings shared by every job, assembled from the command line.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub homepage_url: String,
    /// Date the job runs for; names the bulletin file.
    pub run_date: NaiveDate,
    /// Value written for stations without a reading.
    pub placeholder: f64,
    pub layout: ColumnLayout,
    /// Weekday on which the 8-day zone averages are appended.
    pub weekly_anchor: Weekday,
    pub debug: bool,
}

impl AppConfig {
    /// Days subtracted from the run date to get the observation date.
    /// The bulletin's minimum temperature is recorded against the previous day.
    pub fn date_offset(&self, variable: Variable) -> i64 {
        match variable {
            Variable::Tmin => 1,
            _ => 0,
        }
    }

    pub fn observation_date(&self, variable: Variable) -> NaiveDate {
        self.run_date - Duration::days(self.date_offset(variable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            data_dir: PathBuf::from("."),
            homepage_url: String::new(),
            run_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            placeholder: 0.0,
            layout: ColumnLayout::default(),
            weekly_anchor: Weekday::Thu,
            debug: false,
        }
    }

    #[test]
    fn tmin_is_recorded_against_the_previous_day() {
        let cfg = config();
        assert_eq!(cfg.observation_date(Variable::Tmax), cfg.run_date);
        assert_eq!(cfg.observation_date(Variable::Rainfall), cfg.run_date);
        assert_eq!(cfg.observation_date(Variable::Tmin), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn default_layout_reads_consecutive_columns() {
        let layout = ColumnLayout::default();
        assert_eq!(layout.column(Variable::Tmax), Some(1));
        assert_eq!(layout.column(Variable::Tmin), Some(2));
        assert_eq!(layout.column(Variable::Rainfall), Some(3));
        assert_eq!(layout.width(), 3);
        assert_eq!(ColumnLayout { tmax: 2, tmin: 5, rainfall: 1 }.width(), 5);
        assert_eq!(layout.column(Variable::HydroRainfall), None);
    }
}
