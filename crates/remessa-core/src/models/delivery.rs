//! Delivery units and post-send anomaly records.

use super::customer::Customer;
use crate::extract::INVOICE_NUMBER_SENTINEL;

/// One document on its way through the pipeline.
///
/// Created per inbox file at extraction time and mutated as matching stages
/// succeed; by the end of the run every delivery sits in exactly one outcome
/// bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// File name within the inbox directory.
    pub file_name: String,
    /// SHA-256 of the document bytes; ledger key and receipt correlation id.
    pub content_hash: String,
    /// Tax identifier extracted from the document text, if any.
    pub tax_id: Option<String>,
    /// Matched registry record, once matching succeeds.
    pub customer: Option<Customer>,
    /// Invoice number, or `"0"` when the document carried none.
    pub invoice_number: String,
}

impl Delivery {
    pub fn new(file_name: impl Into<String>, content_hash: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content_hash: content_hash.into(),
            tax_id: None,
            customer: None,
            invoice_number: INVOICE_NUMBER_SENTINEL.to_string(),
        }
    }
}

/// A failure that happened after the transport already accepted the message.
///
/// The delivery stays counted as sent; re-queuing would risk a duplicate
/// send, so the anomaly is only reported for manual reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSendAnomaly {
    pub file_name: String,
    pub detail: String,
}
