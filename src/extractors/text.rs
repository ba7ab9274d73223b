// src/extractors/text.rs
use std::path::{Path, PathBuf};
use crate::utils::error::ExtractError;

/// Source of plain bulletin text, one page at a time.
pub trait TextSource {
    fn page_text(&self, page: usize) -> Result<String, ExtractError>;
}

/// Bulletin PDF on disk, read with `pdf-extract`.
#[derive(Debug, Clone)]
pub struct PdfBulletin {
    path: PathBuf,
}

impl PdfBulletin {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(ExtractError::PdfMissing(path.display().to_string()));
        }
        Ok(Self { path })
    }
}

impl TextSource for PdfBulletin {
    fn page_text(&self, page: usize) -> Result<String, ExtractError> {
        tracing::debug!("Extracting text from {}", self.path.display());
        let text = pdf_extract::extract_text(&self.path)
            .map_err(|e| ExtractError::PdfText(format!("{}: {:?}", self.path.display(), e)))?;
        select_page(&text, page)
    }
}

/// Text already extracted elsewhere (e.g. `pdftotext -layout`).
#[derive(Debug, Clone)]
pub struct PlainText(pub String);

impl PlainText {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
        std::fs::read_to_string(path.as_ref())
            .map(PlainText)
            .map_err(|e| ExtractError::PdfText(format!("{}: {}", path.as_ref().display(), e)))
    }
}

impl TextSource for PlainText {
    fn page_text(&self, page: usize) -> Result<String, ExtractError> {
        select_page(&self.0, page)
    }
}

/// Picks one page out of extracted text. Pages are separated by form feeds;
/// text without any is a single page.
fn select_page(text: &str, page: usize) -> Result<String, ExtractError> {
    text.split('\u{0c}')
        .nth(page)
        .map(str::to_string)
        .ok_or(ExtractError::PageNotFound(page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_pages_on_form_feed() {
        let source = PlainText("first page\n\u{0c}second page\n".to_string());
        assert_eq!(source.page_text(0).unwrap(), "first page\n");
        assert_eq!(source.page_text(1).unwrap(), "second page\n");
        assert!(matches!(source.page_text(2), Err(ExtractError::PageNotFound(2))));
    }

    #[test]
    fn text_without_form_feed_is_one_page() {
        let source = PlainText("only page".to_string());
        assert_eq!(source.page_text(0).unwrap(), "only page");
    }

    #[test]
    fn missing_pdf_is_reported_before_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let err = PdfBulletin::open(dir.path().join("absent.pdf")).unwrap_err();
        assert!(matches!(err, ExtractError::PdfMissing(_)));
    }

    #[test]
    fn corrupt_pdf_is_a_text_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();
        let pdf = PdfBulletin::open(&path).unwrap();
        assert!(matches!(pdf.page_text(0), Err(ExtractError::PdfText(_))));
    }
}
