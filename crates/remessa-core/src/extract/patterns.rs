//! Regex patterns for identifier extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Formatted Brazilian tax identifier: CNPJ (NN.NNN.NNN/NNNN-NN) or
    /// CPF (NNN.NNN.NNN-NN).
    pub static ref TAX_ID: Regex = Regex::new(
        r"(\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2})|(\d{3}\.\d{3}\.\d{3}-\d{2})"
    ).unwrap();
}

/// Label fragment that precedes the invoice number on the document.
pub const DOCUMENT_NUMBER_LABEL: &str = "Núm. do documento";
