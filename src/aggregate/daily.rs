// src/aggregate/daily.rs
use crate::met::models::round2;
use crate::met::Zone;

/// Summary of one day's station values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyStats {
    pub total: f64,
    pub average: f64,
    pub max: f64,
    pub min: f64,
}

impl DailyStats {
    /// `None` for an empty slice. Total and average are rounded to 2 decimals.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let total: f64 = values.iter().sum();
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        Some(Self {
            total: round2(total),
            average: round2(total / values.len() as f64),
            max,
            min,
        })
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Mean of each zone's station values, rounded to 2 decimals.
/// Stations without a value are left out; a zone with none has no average.
pub fn zone_averages(station_values: &[(&str, f64)]) -> Vec<(Zone, Option<f64>)> {
    Zone::ALL
        .iter()
        .map(|zone| {
            let values: Vec<f64> = station_values
                .iter()
                .filter(|(station, _)| zone.stations().iter().any(|s| s.eq_ignore_ascii_case(station)))
                .map(|(_, v)| *v)
                .collect();
            (*zone, mean(&values).map(round2))
        })
        .collect()
}
