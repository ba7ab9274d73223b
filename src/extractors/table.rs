// src/extractors/table.rs

// --- Imports ---
use crate::config::ColumnLayout;
use crate::met::stations::{STATION_ALIASES, HYDRO_STATIONS, MET_STATIONS};
use crate::met::{Reading, Variable};
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Hydro names are printed inconsistently across bulletins.
const HYDRO_ALIASES: &[(&str, &str)] = &[
    ("Victoria", "Victoriya"),
    ("Kukuleganga", "Kukuleganaga"),
];

// --- Station matchers (Lazy Static) ---
pub static MET_MATCHER: Lazy<StationMatcher> = Lazy::new(|| {
    StationMatcher::new(&MET_STATIONS, STATION_ALIASES).expect("Failed to compile MET_MATCHER")
});

pub static HYDRO_MATCHER: Lazy<StationMatcher> = Lazy::new(|| {
    StationMatcher::new(&HYDRO_STATIONS, HYDRO_ALIASES).expect("Failed to compile HYDRO_MATCHER")
});

/// Finds station names inside a line of bulletin text.
///
/// Longer names are tried first, so "Upper Kotmale" is never read as "Kotmale".
/// Multi-word names match across any run of spaces or hyphens.
pub struct StationMatcher {
    re: Regex,
    names: Vec<&'static str>,
    aliases: &'static [(&'static str, &'static str)],
}

impl StationMatcher {
    pub fn new(
        names: &[&'static str],
        aliases: &'static [(&'static str, &'static str)],
    ) -> Result<Self, regex::Error> {
        let mut spellings: Vec<&str> = names.iter().copied()
            .chain(aliases.iter().map(|(alias, _)| *alias))
            .collect();
        spellings.sort_by_key(|s| std::cmp::Reverse(s.len()));

        let alternatives = spellings.iter()
            .map(|s| s.split_whitespace().map(regex::escape).collect::<Vec<_>>().join(r"[\s\-]+"))
            .collect::<Vec<_>>()
            .join("|");
        let re = Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives))?;

        Ok(Self { re, names: names.to_vec(), aliases })
    }

    /// Canonical station name for a matched spelling.
    fn canonical(&self, matched: &str) -> Option<&'static str> {
        let normalized = matched
            .split(|c: char| c.is_whitespace() || c == '-')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        self.names.iter().copied()
            .find(|name| name.eq_ignore_ascii_case(&normalized))
            .or_else(|| {
                self.aliases.iter()
                    .find(|(alias, _)| alias.eq_ignore_ascii_case(&normalized) || alias.eq_ignore_ascii_case(matched))
                    .map(|(_, canonical)| *canonical)
            })
    }

    /// Splits a line into `(station, text up to the next station)` pairs.
    pub fn segments<'t>(&self, line: &'t str) -> Vec<(&'static str, &'t str)> {
        let matches: Vec<_> = self.re.find_iter(line).collect();
        let mut out = Vec::with_capacity(matches.len());
        for (i, m) in matches.iter().enumerate() {
            let end = matches.get(i + 1).map(|next| next.start()).unwrap_or(line.len());
            if let Some(station) = self.canonical(m.as_str()) {
                out.push((station, &line[m.end()..end]));
            }
        }
        out
    }

    /// Regex source, used to highlight station names in debug output.
    pub fn pattern(&self) -> &str {
        self.re.as_str()
    }
}

/// One station row of the bulletin table. Cell 0 is the station name.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRow {
    pub station: &'static str,
    pub cells: Vec<String>,
    /// False when the row has fewer value cells than the layout reads.
    /// A blank cell in the PDF collapses away in extracted text, so the
    /// cells after it can't be placed and none are handed out.
    pub complete: bool,
}

/// Station rows read from the first page of the bulletin.
#[derive(Debug, Clone, Default)]
pub struct StationTable {
    rows: Vec<StationRow>,
}

impl StationTable {
    /// Reads every met station row out of page text.
    ///
    /// A mention only counts as a row when every cell the layout reads looks
    /// like a value, so titles and prose ("Colombo 24 hour rainfall ...") are
    /// skipped wherever they appear. A station named more than once keeps its
    /// first complete row.
    pub fn parse(text: &str, layout: &ColumnLayout) -> Result<Self, ExtractError> {
        let width = layout.width();
        let mut rows: Vec<StationRow> = Vec::new();

        for line in text.lines() {
            for (station, rest) in MET_MATCHER.segments(line) {
                let existing = rows.iter().position(|r| r.station == station);
                if existing.map(|i| rows[i].complete).unwrap_or(false) {
                    continue;
                }

                let tokens: Vec<&str> = rest.split_whitespace().collect();
                let read = &tokens[..tokens.len().min(width)];
                if read.is_empty() || !read.iter().all(|t| looks_like_reading(t)) {
                    tracing::trace!("Skipping '{}' mention without values: '{}'", station, line.trim());
                    continue;
                }

                let complete = read.len() == width;
                if !complete {
                    if existing.is_some() {
                        continue;
                    }
                    tracing::warn!(
                        "{} row has {} of {} value cells; treating its readings as missing: '{}'",
                        station, read.len(), width, line.trim()
                    );
                }

                let mut cells = Vec::with_capacity(tokens.len() + 1);
                cells.push(station.to_string());
                cells.extend(tokens.iter().map(|t| t.to_string()));
                let row = StationRow { station, cells, complete };
                match existing {
                    Some(i) => rows[i] = row,
                    None => rows.push(row),
                }
            }
        }

        if rows.is_empty() {
            return Err(ExtractError::EmptyTable);
        }
        tracing::debug!("Parsed {} station rows from bulletin table", rows.len());
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, station: &str) -> Option<&StationRow> {
        self.rows.iter().find(|r| r.station.eq_ignore_ascii_case(station))
    }

    /// Cell text of a complete row.
    pub fn cell(&self, station: &str, column: usize) -> Option<&str> {
        self.row(station)
            .filter(|r| r.complete)
            .and_then(|r| r.cells.get(column))
            .map(String::as_str)
    }

    /// Cell text `variable` is read from, as printed.
    pub fn raw_cell(&self, station: &str, variable: Variable, layout: &ColumnLayout) -> Option<&str> {
        layout.column(variable).and_then(|col| self.cell(station, col))
    }

    /// Reading of `variable` for `station`; absent rows, incomplete rows
    /// and absent cells are missing.
    pub fn reading(&self, station: &str, variable: Variable, layout: &ColumnLayout) -> Reading {
        self.raw_cell(station, variable, layout)
            .map(Reading::parse)
            .unwrap_or(Reading::Missing)
    }
}

fn looks_like_reading(token: &str) -> bool {
    !matches!(Reading::parse(token), Reading::Missing)
        || ["NA", "N/A", "-", "--"].iter().any(|m| m.eq_ignore_ascii_case(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = "\
Daily Climate Update  Department of Meteorology
Station            Max    Min    Rainfall
                   (C)    (C)    (mm)
Anuradhapura       33.2   24.1   0.0
Badulla            29.0   18.6   tr
Colombo            31.0   25.3   12.4     Galle   30.2  24.8  NA
Maha  Illuppallama 32.5   23.0   3.1
Nuwara Eliya       20.4   11.2   5.6
Mattla             34.0   25.0   0.0
Rainfall at Colombo was the highest in the Western Plains.
";

    #[test]
    fn reads_rows_by_station_name() {
        let table = StationTable::parse(PAGE, &ColumnLayout::default()).unwrap();
        let layout = ColumnLayout::default();

        assert_eq!(table.len(), 7);
        assert_eq!(table.reading("Anuradhapura", Variable::Tmax, &layout), Reading::Value(33.2));
        assert_eq!(table.reading("Badulla", Variable::Rainfall, &layout), Reading::Trace);
        assert_eq!(table.reading("Galle", Variable::Tmin, &layout), Reading::Value(24.8));
        assert_eq!(table.reading("Galle", Variable::Rainfall, &layout), Reading::Missing);
        assert_eq!(table.reading("Maha Illuppallama", Variable::Rainfall, &layout), Reading::Value(3.1));
        assert_eq!(table.reading("Mattala", Variable::Tmax, &layout), Reading::Value(34.0));
    }

    #[test]
    fn second_station_on_a_line_does_not_leak_into_the_first() {
        let table = StationTable::parse(PAGE, &ColumnLayout::default()).unwrap();
        assert_eq!(
            table.row("Colombo").unwrap().cells,
            vec!["Colombo", "31.0", "25.3", "12.4"]
        );
    }

    #[test]
    fn prose_mentions_do_not_replace_table_rows() {
        let table = StationTable::parse(PAGE, &ColumnLayout::default()).unwrap();
        assert_eq!(table.cell("Colombo", 1), Some("31.0"));

        let prose_first = "Colombo 24 hour rainfall was heavy\nColombo 31.0 25.0 1.0";
        let table = StationTable::parse(prose_first, &ColumnLayout::default()).unwrap();
        assert_eq!(table.row("Colombo").unwrap().cells, vec!["Colombo", "31.0", "25.0", "1.0"]);
        assert_eq!(table.reading("Colombo", Variable::Tmax, &ColumnLayout::default()), Reading::Value(31.0));
    }

    #[test]
    fn blank_cell_leaves_the_row_missing_instead_of_shifting() {
        let text = "Jaffna         33.5          0.0\nGalle 30.2 24.8 1.1";
        let layout = ColumnLayout::default();
        let table = StationTable::parse(text, &layout).unwrap();

        assert!(!table.row("Jaffna").unwrap().complete);
        assert_eq!(table.reading("Jaffna", Variable::Tmax, &layout), Reading::Missing);
        assert_eq!(table.reading("Jaffna", Variable::Tmin, &layout), Reading::Missing);
        assert_eq!(table.reading("Jaffna", Variable::Rainfall, &layout), Reading::Missing);
        assert_eq!(table.reading("Galle", Variable::Rainfall, &layout), Reading::Value(1.1));
    }

    #[test]
    fn complete_row_replaces_an_earlier_short_one() {
        let text = "Jaffna 33.5\nJaffna 33.5 26.0 0.0";
        let table = StationTable::parse(text, &ColumnLayout::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.reading("Jaffna", Variable::Tmin, &ColumnLayout::default()), Reading::Value(26.0));
    }

    #[test]
    fn absent_station_is_missing() {
        let table = StationTable::parse(PAGE, &ColumnLayout::default()).unwrap();
        assert_eq!(table.reading("Jaffna", Variable::Tmax, &ColumnLayout::default()), Reading::Missing);
    }

    #[test]
    fn custom_layout_moves_columns() {
        let table = StationTable::parse(PAGE, &ColumnLayout::default()).unwrap();
        let swapped = ColumnLayout { tmax: 1, tmin: 3, rainfall: 2 };
        assert_eq!(table.reading("Anuradhapura", Variable::Tmin, &swapped), Reading::Value(0.0));
    }

    #[test]
    fn text_without_stations_is_an_empty_table() {
        assert!(matches!(StationTable::parse("no table here", &ColumnLayout::default()), Err(ExtractError::EmptyTable)));
    }

    #[test]
    fn longer_hydro_names_win() {
        let segments = HYDRO_MATCHER.segments("Upper Kotmale 14.2  Kotmale 9.8");
        assert_eq!(segments, vec![("Upper Kotmale", " 14.2  "), ("Kotmale", " 9.8")]);
    }
}
