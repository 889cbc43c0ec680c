//! PDF text extraction module.

mod extractor;

pub use extractor::PdfTextSource;

use crate::error::ExtractionError;

/// One positioned fragment of document text.
///
/// The scan that extracts identifiers only relies on fragment order; the
/// position fields are carried for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFragment {
    /// Page number (1-indexed).
    pub page: u32,
    /// Line index within the page (0-indexed).
    pub line: u32,
    /// Fragment content, trimmed.
    pub text: String,
}

impl TextFragment {
    pub fn new(page: u32, line: u32, text: impl Into<String>) -> Self {
        Self {
            page,
            line,
            text: text.into(),
        }
    }
}

/// Result type for text extraction.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Seam for the text-extraction engine.
///
/// The engine is a black-box collaborator: anything that can turn document
/// bytes into an ordered fragment sequence can drive the pipeline.
pub trait TextSource {
    /// Extract the ordered text fragments of a document.
    fn fragments(&self, data: &[u8]) -> Result<Vec<TextFragment>>;
}
