// src/extractors/station.rs
use chrono::NaiveDate;
use crate::aggregate::{zone_averages, DailyStats};
use crate::config::ColumnLayout;
use crate::extractors::table::StationTable;
use crate::met::models::{format_number, format_sheet_date};
use crate::met::{Reading, Variable, MET_STATIONS};
use crate::storage::sheet::{Record, DATE_COLUMN, VARIABLE_COLUMN};

/// One variable's readings for every met station on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub variable: Variable,
    pub readings: Vec<(&'static str, Reading)>,
}

impl DailyRecord {
    pub fn from_table(table: &StationTable, variable: Variable, date: NaiveDate, layout: &ColumnLayout) -> Self {
        let readings = MET_STATIONS
            .iter()
            .map(|station| (*station, table.reading(station, variable, layout)))
            .collect();
        Self { date, variable, readings }
    }

    /// Record for a day without a usable bulletin: every station missing.
    pub fn placeholder(variable: Variable, date: NaiveDate) -> Self {
        let readings = MET_STATIONS.iter().map(|station| (*station, Reading::Missing)).collect();
        Self { date, variable, readings }
    }

    pub fn missing_stations(&self) -> Vec<&'static str> {
        self.readings
            .iter()
            .filter(|(_, r)| r.value().is_none())
            .map(|(s, _)| *s)
            .collect()
    }

    /// Station values with `placeholder` standing in for missing readings.
    pub fn values(&self, placeholder: f64) -> Vec<(&'static str, f64)> {
        self.readings.iter().map(|(s, r)| (*s, r.value_or(placeholder))).collect()
    }

    /// Sheet row: stations, daily statistics and zone averages.
    pub fn to_record(&self, placeholder: f64) -> Record {
        let values = self.values(placeholder);
        let label = self.variable.label();

        let mut record: Record = vec![
            (DATE_COLUMN.to_string(), format_sheet_date(self.date)),
            (VARIABLE_COLUMN.to_string(), label.to_string()),
        ];
        record.extend(values.iter().map(|(s, v)| (s.to_string(), format_number(*v))));

        let plain: Vec<f64> = values.iter().map(|(_, v)| *v).collect();
        if let Some(stats) = DailyStats::from_values(&plain) {
            record.push((self.variable.total_column(), format_number(stats.total)));
            record.push((self.variable.average_column(), format_number(stats.average)));
            record.push((self.variable.max_column(), format_number(stats.max)));
            record.push((self.variable.min_column(), format_number(stats.min)));
        }

        for (zone, avg) in zone_averages(&values) {
            record.push((format!("Average {}", zone.name()), avg.map(format_number).unwrap_or_default()));
        }
        record
    }
}
