//! Identifier extraction from document text fragments.

pub mod patterns;

pub use patterns::{DOCUMENT_NUMBER_LABEL, TAX_ID};

use crate::pdf::TextFragment;

/// Invoice number value meaning "not found".
pub const INVOICE_NUMBER_SENTINEL: &str = "0";

/// The (taxId, invoiceNumber) pair pulled out of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedIdentifiers {
    /// Formatted CPF/CNPJ, absent when no pattern matched.
    pub tax_id: Option<String>,
    /// Invoice number, `"0"` when no document-number label was found.
    pub invoice_number: String,
}

/// Stateful scan over a document's fragments.
///
/// Tax-id capture: the last formatted CPF/CNPJ in document order wins,
/// except the operating company's own identifier, which is never captured.
/// Invoice-number capture: the document-number label arms the scanner; the
/// next purely numeric fragment (truncated at `/` for composite values like
/// `12345/1`) is taken as the invoice number.
#[derive(Debug, Clone)]
pub struct IdentifierScanner {
    company_tax_id: String,
}

impl IdentifierScanner {
    /// `company_tax_id` is the reserved sender identifier to skip.
    pub fn new(company_tax_id: impl Into<String>) -> Self {
        Self {
            company_tax_id: company_tax_id.into(),
        }
    }

    pub fn scan<'a, I>(&self, fragments: I) -> ExtractedIdentifiers
    where
        I: IntoIterator<Item = &'a TextFragment>,
    {
        let mut tax_id: Option<String> = None;
        let mut invoice_number = INVOICE_NUMBER_SENTINEL.to_string();
        let mut capture_armed = false;

        for fragment in fragments {
            let text = fragment.text.trim();

            for found in TAX_ID.find_iter(text) {
                if found.as_str() != self.company_tax_id {
                    tax_id = Some(found.as_str().to_string());
                }
            }

            if capture_armed {
                // Composite values like 12345/1 keep only the leading part.
                let candidate = match text.find('/') {
                    Some(idx) if idx > 0 => &text[..idx],
                    _ => text,
                };
                if !candidate.is_empty() && candidate.chars().all(|c| c.is_ascii_digit()) {
                    invoice_number = candidate.to_string();
                    capture_armed = false;
                }
            }

            if text.contains(DOCUMENT_NUMBER_LABEL) {
                capture_armed = true;
            }
        }

        ExtractedIdentifiers {
            tax_id,
            invoice_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const COMPANY: &str = "48.263.115/0001-03";

    fn fragments(texts: &[&str]) -> Vec<TextFragment> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| TextFragment::new(1, i as u32, *t))
            .collect()
    }

    #[test]
    fn reserved_sender_id_is_never_captured() {
        let scanner = IdentifierScanner::new(COMPANY);
        let frags = fragments(&["Emitente", COMPANY, "Vencimento"]);
        let ids = scanner.scan(&frags);
        assert_eq!(ids.tax_id, None);
    }

    #[test]
    fn customer_id_after_reserved_id_wins() {
        let scanner = IdentifierScanner::new(COMPANY);
        let frags = fragments(&[
            COMPANY,
            "123.456.789-01",
            "Núm. do documento",
            "98765/2",
        ]);
        let ids = scanner.scan(&frags);
        assert_eq!(ids.tax_id.as_deref(), Some("123.456.789-01"));
        assert_eq!(ids.invoice_number, "98765");
    }

    #[test]
    fn last_non_reserved_match_wins() {
        let scanner = IdentifierScanner::new(COMPANY);
        let frags = fragments(&["111.222.333-44", "555.666.777-88"]);
        let ids = scanner.scan(&frags);
        assert_eq!(ids.tax_id.as_deref(), Some("555.666.777-88"));
    }

    #[test]
    fn cnpj_customers_are_captured() {
        let scanner = IdentifierScanner::new(COMPANY);
        let frags = fragments(&["Sacado: 11.222.333/0001-44"]);
        let ids = scanner.scan(&frags);
        assert_eq!(ids.tax_id.as_deref(), Some("11.222.333/0001-44"));
    }

    #[test]
    fn missing_label_keeps_sentinel() {
        let scanner = IdentifierScanner::new(COMPANY);
        let frags = fragments(&["123.456.789-01", "12345"]);
        let ids = scanner.scan(&frags);
        assert_eq!(ids.invoice_number, INVOICE_NUMBER_SENTINEL);
    }

    #[test]
    fn non_numeric_fragment_after_label_is_skipped() {
        let scanner = IdentifierScanner::new(COMPANY);
        let frags = fragments(&["Núm. do documento", "Valor", "54321"]);
        let ids = scanner.scan(&frags);
        assert_eq!(ids.invoice_number, "54321");
    }

    #[test]
    fn composite_invoice_number_is_truncated_at_separator() {
        let scanner = IdentifierScanner::new(COMPANY);
        let frags = fragments(&["Núm. do documento", "12345/1"]);
        let ids = scanner.scan(&frags);
        assert_eq!(ids.invoice_number, "12345");
    }

    #[test]
    fn no_identifier_and_no_label_yield_defaults() {
        let scanner = IdentifierScanner::new(COMPANY);
        let frags = fragments(&["Pagável em qualquer banco", "R$ 100,00"]);
        let ids = scanner.scan(&frags);
        assert_eq!(ids.tax_id, None);
        assert_eq!(ids.invoice_number, INVOICE_NUMBER_SENTINEL);
    }

    #[test]
    fn label_embedded_in_longer_fragment_arms_capture() {
        let scanner = IdentifierScanner::new(COMPANY);
        let frags = fragments(&["Data | Núm. do documento | Valor", "777"]);
        let ids = scanner.scan(&frags);
        assert_eq!(ids.invoice_number, "777");
    }
}
