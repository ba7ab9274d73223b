// src/bulletin/models.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Home page of the Department of Meteorology, which links the daily bulletin.
pub const DEFAULT_HOMEPAGE_URL: &str = "https://meteo.gov.lk/index.php?lang=en";

/// Menu entry holding the "Daily Climate Update" link.
pub const BULLETIN_LINK_SELECTOR: &str = r#"li[data-id="567"][data-level="2"] a[href]"#;

/// Metadata saved next to every downloaded bulletin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletinInfo {
    pub source_url: String,
    pub page_url: String,
    pub run_date: NaiveDate,
    pub size_bytes: usize,
    pub downloaded_at: DateTime<Utc>,
}

impl BulletinInfo {
    /// Local file name of the bulletin for a run date.
    pub fn file_name(run_date: NaiveDate) -> String {
        format!("daily_climate_update_{}.pdf", run_date.format("%Y-%m-%d"))
    }

    pub fn meta_file_name(run_date: NaiveDate) -> String {
        format!("daily_climate_update_{}_meta.json", run_date.format("%Y-%m-%d"))
    }
}
