// src/charts/series.rs
use chrono::{Duration, NaiveDate};
use crate::met::models::parse_sheet_date;
use crate::met::Variable;
use crate::storage::sheet::{Sheet, DATE_COLUMN};

/// Days of history shown on every chart.
pub const CHART_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Numeric values of `column` from `variable`'s daily rows dated within
/// `[end - days, end]`, oldest first.
pub fn daily_series(sheet: &Sheet, variable: Variable, column: &str, end: NaiveDate, days: i64) -> Vec<SeriesPoint> {
    let start = end - Duration::days(days);
    let mut points: Vec<SeriesPoint> = sheet
        .rows_for(variable.label())
        .filter_map(|row| {
            let date = row.get(DATE_COLUMN).and_then(parse_sheet_date)?;
            let value = row.get(column)?.trim().parse::<f64>().ok()?;
            Some(SeriesPoint { date, value })
        })
        .filter(|p| p.date >= start && p.date <= end && p.value.is_finite())
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

/// Running total of a daily series with its "normal" reference level.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulation {
    pub points: Vec<SeriesPoint>,
    /// Mean of the cumulative series.
    pub normal: f64,
}

impl Accumulation {
    pub fn from_daily(series: &[SeriesPoint]) -> Option<Self> {
        if series.is_empty() {
            return None;
        }
        let mut running = 0.0;
        let points: Vec<SeriesPoint> = series
            .iter()
            .map(|p| {
                running += p.value;
                SeriesPoint { date: p.date, value: running }
            })
            .collect();
        let normal = points.iter().map(|p| p.value).sum::<f64>() / points.len() as f64;
        Some(Self { points, normal })
    }

    /// Polygons between the cumulative curve and the normal line, with
    /// `true` for the parts above normal. x is the point index; segments
    /// crossing the normal line are split where they cross it.
    pub fn fill_regions(&self) -> Vec<(Vec<(f64, f64)>, bool)> {
        let normal = self.normal;
        let mut regions = Vec::new();

        for (i, pair) in self.points.windows(2).enumerate() {
            let (x0, y0) = (i as f64, pair[0].value);
            let (x1, y1) = (i as f64 + 1.0, pair[1].value);
            let above0 = y0 >= normal;
            let above1 = y1 >= normal;

            if above0 == above1 {
                regions.push((vec![(x0, normal), (x0, y0), (x1, y1), (x1, normal)], above0));
            } else {
                let xc = x0 + (normal - y0) / (y1 - y0) * (x1 - x0);
                regions.push((vec![(x0, normal), (x0, y0), (xc, normal)], above0));
                regions.push((vec![(xc, normal), (x1, y1), (x1, normal)], above1));
            }
        }
        regions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sheet::record;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
    }

    fn point(d: u32, value: f64) -> SeriesPoint {
        SeriesPoint { date: day(d), value }
    }

    #[test]
    fn series_is_windowed_sorted_and_skips_other_rows() {
        let mut sheet = Sheet::new();
        sheet.push(&record([("Date", "09/20/2024"), ("Variable", "Rainfall"), ("Average Rainfall", "4.0")]));
        sheet.push(&record([("Date", "08/01/2024"), ("Variable", "Rainfall"), ("Average Rainfall", "9.0")]));
        sheet.push(&record([("Date", "09/10/2024"), ("Variable", "Rainfall"), ("Average Rainfall", "2.5")]));
        sheet.push(&record([("Date", "09/12/2024"), ("Variable", "8-day Average"), ("Average Rainfall", "7.0")]));
        sheet.push(&record([("Date", "09/15/2024"), ("Variable", "Rainfall"), ("Average Rainfall", "")]));

        let series = daily_series(&sheet, Variable::Rainfall, "Average Rainfall", day(30), CHART_WINDOW_DAYS);
        assert_eq!(series, vec![point(10, 2.5), point(20, 4.0)]);
    }

    #[test]
    fn accumulation_runs_and_normal_is_mean_of_running_total() {
        let acc = Accumulation::from_daily(&[point(1, 2.0), point(2, 0.0), point(3, 4.0)]).unwrap();
        let totals: Vec<f64> = acc.points.iter().map(|p| p.value).collect();
        assert_eq!(totals, vec![2.0, 2.0, 6.0]);
        assert_eq!(acc.normal, 10.0 / 3.0);
        assert_eq!(Accumulation::from_daily(&[]), None);
    }

    #[test]
    fn regions_split_where_curve_crosses_normal() {
        let acc = Accumulation { points: vec![point(1, 0.0), point(2, 4.0), point(3, 6.0)], normal: 2.0 };
        let regions = acc.fill_regions();

        assert_eq!(regions.len(), 3);
        assert_eq!(regions[0], (vec![(0.0, 2.0), (0.0, 0.0), (0.5, 2.0)], false));
        assert_eq!(regions[1], (vec![(0.5, 2.0), (1.0, 4.0), (1.0, 2.0)], true));
        assert!(regions[2].1);
    }
}
