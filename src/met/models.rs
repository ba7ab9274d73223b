// src/met/models.rs
use chrono::NaiveDate;
use clap::ValueEnum;

/// Date format used in every sheet (`mm/dd/YYYY`).
pub const SHEET_DATE_FORMAT: &str = "%m/%d/%Y";

/// Observed quantity carried by a bulletin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Variable {
    Tmax,
    Tmin,
    Rainfall,
    #[value(skip)]
    HydroRainfall,
}

impl Variable {
    /// Variables read from the main station table.
    pub const MET: [Variable; 3] = [Variable::Tmax, Variable::Tmin, Variable::Rainfall];

    /// Name written in the `Variable` column and used in derived column names.
    pub fn label(&self) -> &'static str {
        match self {
            Variable::Tmax => "Tmax",
            Variable::Tmin => "Tmin",
            Variable::Rainfall => "Rainfall",
            Variable::HydroRainfall => "Hydro Rainfall",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Variable::Tmax | Variable::Tmin => "°C",
            Variable::Rainfall | Variable::HydroRainfall => "mm",
        }
    }

    /// CSV file under `extracted_data/` holding this variable's daily rows.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            Variable::Tmax => "metstation_tmax_data.csv",
            Variable::Tmin => "metstation_tmin_data.csv",
            Variable::Rainfall => "metstation_rainfall_data.csv",
            Variable::HydroRainfall => "hydro_catchment_data.csv",
        }
    }

    /// Sub-directory of `Graphs/` for this variable's charts.
    pub fn chart_dir(&self) -> &'static str {
        match self {
            Variable::Tmax => "Avg_Tmax",
            Variable::Tmin => "Avg_Tmin",
            Variable::Rainfall | Variable::HydroRainfall => "Avg_RF",
        }
    }

    pub fn total_column(&self) -> String {
        format!("Total {}", self.label())
    }

    pub fn average_column(&self) -> String {
        format!("Average {}", self.label())
    }

    pub fn max_column(&self) -> String {
        format!("Max {}", self.label())
    }

    pub fn min_column(&self) -> String {
        format!("Min {}", self.label())
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Parsed content of one bulletin cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Value(f64),
    /// Rainfall too small to measure (`tr`).
    Trace,
    Missing,
    /// Non-numeric hydro entry, kept as printed.
    Text(String),
}

impl Reading {
    /// Parses a station-table cell. `NA`, dashes and garbage are missing.
    pub fn parse(cell: &str) -> Self {
        let cell = cell.trim();
        if cell.eq_ignore_ascii_case("tr") {
            return Reading::Trace;
        }
        match cell.parse::<f64>() {
            Ok(v) if v.is_finite() => Reading::Value(v),
            _ => Reading::Missing,
        }
    }

    /// Parses a hydro token: numbers become values, anything else is kept verbatim.
    pub fn parse_hydro(token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() || token.eq_ignore_ascii_case("na") {
            return Reading::Missing;
        }
        match token.parse::<f64>() {
            Ok(v) if v.is_finite() => Reading::Value(v),
            _ => Reading::Text(token.to_string()),
        }
    }

    /// Numeric value, trace counting as zero.
    pub fn value(&self) -> Option<f64> {
        match self {
            Reading::Value(v) => Some(*v),
            Reading::Trace => Some(0.0),
            Reading::Missing | Reading::Text(_) => None,
        }
    }

    pub fn value_or(&self, placeholder: f64) -> f64 {
        self.value().unwrap_or(placeholder)
    }

    /// Raw cell text as written to the combined sheet.
    pub fn to_cell(&self) -> String {
        match self {
            Reading::Value(v) => format_number(*v),
            Reading::Trace => "TR".to_string(),
            Reading::Missing => "NA".to_string(),
            Reading::Text(s) => s.clone(),
        }
    }
}

/// Formats a number the way the sheets have always stored it (`31.0`, `2.35`).
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{:.1}", v)
    } else {
        v.to_string()
    }
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn format_sheet_date(date: NaiveDate) -> String {
    date.format(SHEET_DATE_FORMAT).to_string()
}

pub fn parse_sheet_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), SHEET_DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_table_cells() {
        assert_eq!(Reading::parse(" 31.4 "), Reading::Value(31.4));
        assert_eq!(Reading::parse("tr"), Reading::Trace);
        assert_eq!(Reading::parse("TR"), Reading::Trace);
        assert_eq!(Reading::parse("NA"), Reading::Missing);
        assert_eq!(Reading::parse("-"), Reading::Missing);
        assert_eq!(Reading::parse(""), Reading::Missing);
        assert_eq!(Reading::parse("NaN"), Reading::Missing);
    }

    #[test]
    fn parses_hydro_tokens() {
        assert_eq!(Reading::parse_hydro("12.5"), Reading::Value(12.5));
        assert_eq!(Reading::parse_hydro("Nil"), Reading::Text("Nil".to_string()));
        assert_eq!(Reading::parse_hydro("NA"), Reading::Missing);
    }

    #[test]
    fn trace_counts_as_zero_and_missing_uses_placeholder() {
        assert_eq!(Reading::Trace.value(), Some(0.0));
        assert_eq!(Reading::Missing.value_or(-99.0), -99.0);
        assert_eq!(Reading::Text("x".into()).value(), None);
    }

    #[test]
    fn formats_cells() {
        assert_eq!(Reading::Value(31.0).to_cell(), "31.0");
        assert_eq!(Reading::Value(2.35).to_cell(), "2.35");
        assert_eq!(Reading::Trace.to_cell(), "TR");
        assert_eq!(Reading::Missing.to_cell(), "NA");
        assert_eq!(round2(27.456), 27.46);
    }

    #[test]
    fn sheet_dates_round_trip_through_mm_dd_yyyy() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
        assert_eq!(format_sheet_date(date), "01/04/2024");
        assert_eq!(parse_sheet_date("01/04/2024"), Some(date));
        assert_eq!(parse_sheet_date("2024-01-04"), None);
    }
}
