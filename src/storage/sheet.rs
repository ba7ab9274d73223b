// src/storage/sheet.rs
use std::fs;
use std::path::Path;
use crate::utils::error::StorageError;

pub const DATE_COLUMN: &str = "Date";
pub const VARIABLE_COLUMN: &str = "Variable";

/// One output row as ordered `(column, value)` pairs.
pub type Record = Vec<(String, String)>;

/// A CSV sheet whose rows need not share the same columns.
///
/// Adding a row with unseen columns appends them to the header; earlier rows
/// read as empty in those columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Borrowed view of one sheet row.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    headers: &'a [String],
    cells: &'a [String],
}

impl<'a> RowRef<'a> {
    /// Cell under `column`; empty cells read as `None`.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = self.headers.iter().position(|h| h == column)?;
        self.cells.get(idx).map(String::as_str).filter(|c| !c.trim().is_empty())
    }
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a sheet; a file that does not exist yet is an empty sheet.
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        if !path.exists() {
            tracing::debug!("Sheet {} does not exist yet", path.display());
            return Ok(Self::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Ok(Self::new());
        }

        let mut rows = Vec::new();
        for (line, result) in reader.records().enumerate() {
            let record = result?;
            let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
            if cells.len() > headers.len() {
                // Rows appended under an older, narrower header.
                tracing::warn!(
                    "{}: row {} has {} cells for {} columns; extra cells dropped",
                    path.display(), line + 2, cells.len(), headers.len()
                );
                cells.truncate(headers.len());
            }
            cells.resize(headers.len(), String::new());
            rows.push(cells);
        }

        tracing::debug!("Loaded {} rows from {}", rows.len(), path.display());
        Ok(Self { headers, rows })
    }

    /// Rewrites the whole sheet, header included.
    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> {
        self.rows.iter().map(move |cells| RowRef { headers: &self.headers, cells })
    }

    /// Rows whose `Variable` column equals `label`.
    pub fn rows_for<'s>(&'s self, label: &'s str) -> impl Iterator<Item = RowRef<'s>> + 's {
        self.rows().filter(move |row| row.get(VARIABLE_COLUMN) == Some(label))
    }

    fn column_index(&mut self, column: &str) -> usize {
        match self.headers.iter().position(|h| h == column) {
            Some(idx) => idx,
            None => {
                self.headers.push(column.to_string());
                for row in &mut self.rows {
                    row.push(String::new());
                }
                self.headers.len() - 1
            }
        }
    }

    fn to_cells(&mut self, record: &Record) -> Vec<String> {
        let indices: Vec<usize> = record.iter().map(|(col, _)| self.column_index(col)).collect();
        let mut cells = vec![String::new(); self.headers.len()];
        for (idx, (_, value)) in indices.into_iter().zip(record) {
            cells[idx] = value.clone();
        }
        cells
    }

    pub fn push(&mut self, record: &Record) {
        let cells = self.to_cells(record);
        self.rows.push(cells);
    }

    /// Replaces the row with the same date (and variable, when the record has
    /// one) or appends. Returns `true` when a row was replaced.
    pub fn upsert(&mut self, record: &Record) -> bool {
        let key_of = |col: &str| record.iter().find(|(c, _)| c == col).map(|(_, v)| v.as_str());
        let date = key_of(DATE_COLUMN);
        let variable = key_of(VARIABLE_COLUMN);

        let existing = self.rows().position(|row| {
            row.get(DATE_COLUMN) == date && (variable.is_none() || row.get(VARIABLE_COLUMN) == variable)
        });

        let cells = self.to_cells(record);
        match existing {
            Some(idx) => {
                self.rows[idx] = cells;
                true
            }
            None => {
                self.rows.push(cells);
                false
            }
        }
    }
}

/// Builds a record from borrowed pairs.
pub fn record<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Record {
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}
