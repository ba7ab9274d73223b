// src/extractors/mod.rs
pub mod combined;
pub mod hydro;
pub mod station;
pub mod table;
pub mod text;

// Re-export key extraction types for convenience
pub use combined::{combined_records, COMBINED_SHEET};
pub use hydro::HydroRecord;
pub use station::DailyRecord;
pub use table::StationTable;
pub use text::{PdfBulletin, PlainText, TextSource};
