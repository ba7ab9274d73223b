// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum BulletinError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error {0} for {1}")]
    Http(reqwest::StatusCode, String), // e.g., 404 Not Found, 503 on a bad day

    #[error("Invalid URL '{0}': {1}")]
    Url(String, String),

    #[error("Could not resolve bulletin link '{0}' against the page URL")]
    BadLink(String),

    #[error("Daily bulletin link not found on {0}")]
    LinkNotFound(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Bulletin PDF not found: {0}")]
    PdfMissing(String),

    #[error("Could not read text from bulletin PDF: {0}")]
    PdfText(String),

    #[error("Page {0} not present in bulletin")]
    PageNotFound(usize),

    #[error("No station rows found in bulletin table")]
    EmptyTable,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("No rows with '{0}' in the last {1} days")]
    NoData(String, i64),

    #[error("Rendering failed: {0}")]
    Render(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Bulletin download failed: {0}")]
    Bulletin(#[from] BulletinError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    #[error("Processing error: {0}")]
    Processing(String),
}
