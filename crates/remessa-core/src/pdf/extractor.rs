//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, trace};

use super::{Result, TextFragment, TextSource};
use crate::error::ExtractionError;

/// Fragment source backed by lopdf with a pdf-extract fallback.
///
/// Invoices put the identifiers on the first page, so only that page is
/// fragmented.
#[derive(Debug, Default)]
pub struct PdfTextSource;

impl PdfTextSource {
    pub fn new() -> Self {
        Self
    }

    fn first_page_text(&self, data: &[u8]) -> Result<String> {
        let doc = Document::load_mem(data).map_err(|e| ExtractionError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(ExtractionError::Encrypted);
        }

        let pages = doc.get_pages();
        let page_count = pages.len();
        if page_count == 0 {
            return Err(ExtractionError::NoPages);
        }

        let first_page = pages
            .keys()
            .next()
            .copied()
            .ok_or(ExtractionError::NoPages)?;

        match doc.extract_text(&[first_page]) {
            Ok(text) if !text.trim().is_empty() => Ok(text),
            Ok(_) | Err(_) => {
                trace!("lopdf produced no text, falling back to pdf-extract");
                self.first_page_text_fallback(data, page_count)
            }
        }
    }

    /// pdf-extract only yields the whole document, so the first page is
    /// approximated as the leading share of lines.
    fn first_page_text_fallback(&self, data: &[u8], page_count: usize) -> Result<String> {
        let full_text = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| ExtractionError::Text(e.to_string()))?;

        if page_count <= 1 {
            return Ok(full_text);
        }

        let lines: Vec<&str> = full_text.lines().collect();
        let lines_per_page = lines.len() / page_count;
        Ok(lines[..lines_per_page.min(lines.len())].join("\n"))
    }
}

impl TextSource for PdfTextSource {
    fn fragments(&self, data: &[u8]) -> Result<Vec<TextFragment>> {
        let text = self.first_page_text(data)?;

        let fragments: Vec<TextFragment> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(idx, line)| TextFragment::new(1, idx as u32, line))
            .collect();

        debug!("extracted {} fragments from first page", fragments.len());
        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_with_parse_error() {
        let source = PdfTextSource::new();
        let err = source.fragments(b"not a pdf at all").unwrap_err();
        assert!(matches!(err, ExtractionError::Parse(_)));
    }

    #[test]
    fn empty_input_fails() {
        let source = PdfTextSource::new();
        assert!(source.fragments(&[]).is_err());
    }
}
