// src/extractors/combined.rs
use chrono::NaiveDate;
use crate::config::ColumnLayout;
use crate::extractors::table::StationTable;
use crate::met::models::format_sheet_date;
use crate::met::{Reading, Variable, MET_STATIONS};
use crate::storage::sheet::{Record, DATE_COLUMN, VARIABLE_COLUMN};

/// Combined sheet holding the raw Tmax, Tmin and Rainfall cells side by side.
pub const COMBINED_SHEET: &str = "extracted_climate_metdata.csv";

/// One row per met variable with the raw cell of every station. Values keep
/// the bulletin's own text; trace is `TR` and anything else missing is `NA`.
/// Without a table every cell is `NA`.
pub fn combined_records(table: Option<&StationTable>, date: NaiveDate, layout: &ColumnLayout) -> Vec<Record> {
    Variable::MET
        .iter()
        .map(|variable| {
            let mut record: Record = vec![
                (DATE_COLUMN.to_string(), format_sheet_date(date)),
                (VARIABLE_COLUMN.to_string(), variable.label().to_string()),
            ];
            record.extend(MET_STATIONS.iter().map(|station| {
                let raw = table.and_then(|t| t.raw_cell(station, *variable, layout));
                let cell = match raw.map(|c| (c, Reading::parse(c))) {
                    Some((c, Reading::Value(_))) => c.to_string(),
                    Some((_, reading)) => reading.to_cell(),
                    None => Reading::Missing.to_cell(),
                };
                (station.to_string(), cell)
            }));
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_rows_with_raw_cells() {
        let table = StationTable::parse("Colombo 31.0 25.5 tr\nGalle 30.0 NA 4.2", &ColumnLayout::default()).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let rows = combined_records(Some(&table), date, &ColumnLayout::default());

        assert_eq!(rows.len(), 3);
        let cell = |row: &Record, col: &str| row.iter().find(|(c, _)| c == col).unwrap().1.clone();
        assert_eq!(cell(&rows[0], "Variable"), "Tmax");
        assert_eq!(cell(&rows[0], "Colombo"), "31.0");
        assert_eq!(cell(&rows[1], "Galle"), "NA");
        assert_eq!(cell(&rows[2], "Colombo"), "TR");
        assert_eq!(cell(&rows[2], "Jaffna"), "NA");
        assert!(rows.iter().all(|r| r.len() == 2 + 24));
    }

    #[test]
    fn values_keep_their_printed_text() {
        let table = StationTable::parse("Colombo 31 25.50 2.350", &ColumnLayout::default()).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let rows = combined_records(Some(&table), date, &ColumnLayout::default());

        let colombo: Vec<&str> = rows
            .iter()
            .map(|r| r.iter().find(|(c, _)| c == "Colombo").unwrap().1.as_str())
            .collect();
        assert_eq!(colombo, vec!["31", "25.50", "2.350"]);
    }

    #[test]
    fn missing_table_gives_na_rows() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let rows = combined_records(None, date, &ColumnLayout::default());
        assert!(rows.iter().all(|r| r[2..].iter().all(|(_, v)| v == "NA")));
    }
}
