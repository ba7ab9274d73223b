// src/extractors/hydro.rs
use chrono::NaiveDate;
use crate::extractors::table::HYDRO_MATCHER;
use crate::met::models::format_sheet_date;
use crate::met::{Reading, HYDRO_STATIONS};
use crate::storage::sheet::{Record, DATE_COLUMN};

/// Rainfall over the hydro catchments for one day.
#[derive(Debug, Clone, PartialEq)]
pub struct HydroRecord {
    pub date: NaiveDate,
    pub readings: Vec<(&'static str, Reading)>,
}

impl HydroRecord {
    /// Reads the token printed right after each catchment name. The first
    /// number found wins. A word (`Nil`, `spilling`) is only kept while no
    /// number has turned up for that catchment; names never found stay `NA`.
    pub fn from_text(text: &str, date: NaiveDate) -> Self {
        let mut readings: Vec<(&'static str, Reading)> =
            HYDRO_STATIONS.iter().map(|s| (*s, Reading::Missing)).collect();

        for line in text.lines() {
            for (station, rest) in HYDRO_MATCHER.segments(line) {
                let Some(slot) = readings.iter_mut().find(|(s, _)| *s == station) else {
                    continue;
                };
                if matches!(slot.1, Reading::Value(_)) {
                    continue;
                }
                let Some(token) = rest.split_whitespace().next() else {
                    continue;
                };
                let reading = Reading::parse_hydro(token);
                if matches!(reading, Reading::Value(_)) || slot.1 == Reading::Missing {
                    tracing::trace!("Hydro {} -> {:?}", station, reading);
                    slot.1 = reading;
                }
            }
        }

        let found = readings.iter().filter(|(_, r)| *r != Reading::Missing).count();
        tracing::debug!("Found {} of {} hydro catchment values", found, HYDRO_STATIONS.len());
        Self { date, readings }
    }

    pub fn placeholder(date: NaiveDate) -> Self {
        Self::from_text("", date)
    }

    pub fn to_record(&self) -> Record {
        let mut record: Record = vec![(DATE_COLUMN.to_string(), format_sheet_date(self.date))];
        record.extend(self.readings.iter().map(|(s, r)| (s.to_string(), r.to_cell())));
        record
    }
}
