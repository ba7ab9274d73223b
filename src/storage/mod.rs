// src/storage/mod.rs
pub mod sheet;

use std::fs;
use std::path::{Path, PathBuf};
use chrono::NaiveDate;
use crate::bulletin::BulletinInfo;
use crate::utils::error::StorageError;

pub use sheet::{Record, Sheet};

const BULLETIN_DIR: &str = "metdata";
const SHEET_DIR: &str = "extracted_data";
const GRAPH_DIR: &str = "Graphs";
const DEBUG_DIR: &str = "debug";

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Where the bulletin for `run_date` is (or will be) stored.
    pub fn bulletin_path(&self, run_date: NaiveDate) -> PathBuf {
        self.base_dir.join(BULLETIN_DIR).join(BulletinInfo::file_name(run_date))
    }

    /// Saves the downloaded PDF and a JSON metadata file next to it.
    pub fn save_bulletin(&self, bytes: &[u8], info: &BulletinInfo) -> Result<PathBuf, StorageError> {
        let target_dir = self.base_dir.join(BULLETIN_DIR);
        fs::create_dir_all(&target_dir)
            .map_err(StorageError::IoError)?;

        let file_path = self.bulletin_path(info.run_date);
        fs::write(&file_path, bytes)
            .map_err(StorageError::IoError)?;
        tracing::info!("Saved bulletin to {}", file_path.display());

        let meta_path = target_dir.join(BulletinInfo::meta_file_name(info.run_date));
        let metadata_str = serde_json::to_string_pretty(info)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&meta_path, metadata_str)
            .map_err(StorageError::IoError)?;
        tracing::debug!("Saved bulletin metadata to {}", meta_path.display());

        Ok(file_path)
    }

    /// Reads the metadata saved with a bulletin, if any.
    pub fn bulletin_info(&self, run_date: NaiveDate) -> Result<Option<BulletinInfo>, StorageError> {
        let meta_path = self.base_dir.join(BULLETIN_DIR).join(BulletinInfo::meta_file_name(run_date));
        if !meta_path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&meta_path)?;
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::SerializationError(format!("{}: {}", meta_path.display(), e)))
    }

    pub fn sheet_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(SHEET_DIR).join(name)
    }

    pub fn load_sheet(&self, name: &str) -> Result<Sheet, StorageError> {
        Sheet::load(&self.sheet_path(name))
    }

    pub fn save_sheet(&self, name: &str, sheet: &Sheet) -> Result<PathBuf, StorageError> {
        let path = self.sheet_path(name);
        sheet.save(&path)?;
        tracing::info!("Saved {} rows to {}", sheet.len(), path.display());
        Ok(path)
    }

    /// Replaces or adds `records` in a sheet and writes it back.
    pub fn upsert_records(&self, name: &str, records: &[Record]) -> Result<PathBuf, StorageError> {
        let mut sheet = self.load_sheet(name)?;
        for record in records {
            if sheet.upsert(record) {
                tracing::info!("Replaced existing row in {} for {:?}", name, record.first().map(|(_, v)| v));
            }
        }
        self.save_sheet(name, &sheet)
    }

    /// Path for a new chart under `Graphs/<dir>/`, creating the directory.
    pub fn chart_path(&self, dir: &str, file_name: &str) -> Result<PathBuf, StorageError> {
        let target_dir = self.base_dir.join(GRAPH_DIR).join(dir);
        fs::create_dir_all(&target_dir)?;
        Ok(target_dir.join(file_name))
    }

    /// Path for the annotated text dump of a bulletin.
    pub fn debug_path(&self, run_date: NaiveDate) -> Result<PathBuf, StorageError> {
        let target_dir = self.base_dir.join(BULLETIN_DIR).join(DEBUG_DIR);
        fs::create_dir_all(&target_dir)?;
        Ok(target_dir.join(format!("daily_climate_update_{}_annotated.html", run_date.format("%Y-%m-%d"))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn info(run_date: NaiveDate) -> BulletinInfo {
        BulletinInfo {
            source_url: "https://meteo.gov.lk/images/daily.pdf".to_string(),
            page_url: "https://meteo.gov.lk/index.php?lang=en".to_string(),
            run_date,
            size_bytes: 8,
            downloaded_at: Utc.with_ymd_and_hms(2024, 5, 2, 3, 15, 0).unwrap(),
        }
    }

    #[test]
    fn saves_bulletin_and_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path().join("data")).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();

        let path = storage.save_bulletin(b"%PDF-1.4", &info(date)).unwrap();

        assert_eq!(path, dir.path().join("data/metdata/daily_climate_update_2024-05-02.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");
        assert_eq!(storage.bulletin_info(date).unwrap(), Some(info(date)));
    }

    #[test]
    fn bulletin_info_absent_without_download() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        assert_eq!(storage.bulletin_info(date).unwrap(), None);
    }

    #[test]
    fn upsert_records_creates_sheet_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        let rows = vec![sheet::record([("Date", "05/02/2024"), ("Norton", "3.0")])];

        let path = storage.upsert_records("hydro_catchment_data.csv", &rows).unwrap();
        storage.upsert_records("hydro_catchment_data.csv", &rows).unwrap();

        assert!(path.starts_with(dir.path().join("extracted_data")));
        assert_eq!(storage.load_sheet("hydro_catchment_data.csv").unwrap().len(), 1);
    }

    #[test]
    fn chart_path_creates_graph_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        let path = storage.chart_path("Avg_RF", "x.svg").unwrap();
        assert!(dir.path().join("Graphs/Avg_RF").is_dir());
        assert_eq!(path.file_name().unwrap(), "x.svg");
    }
}
