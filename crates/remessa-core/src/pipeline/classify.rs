//! Per-document classification: extraction, matching and dedup check.

use std::fs;
use std::path::Path;

use tracing::{debug, error, warn};

use super::report::RunOutcomes;
use crate::error::{ExtractionError, RemessaError, Result};
use crate::extract::IdentifierScanner;
use crate::hash::content_hash;
use crate::ledger::Ledger;
use crate::models::customer::Customer;
use crate::models::delivery::Delivery;
use crate::pdf::TextSource;
use crate::registry::find_by_id;

/// Where a document goes after the matching stages.
#[derive(Debug)]
pub enum Classification {
    /// Matched and not yet delivered; queued for sending.
    Pending(Delivery),
    /// Matched but its hash is already in the ledger; needs confirmation.
    ResendCandidate(Delivery),
    /// No CPF/CNPJ found in the document text.
    MissingIdentifier(Delivery),
    /// Identifier found but no registry record carries it.
    UnmatchedCustomer(Delivery),
}

/// Non-terminal output of classifying the whole inbox.
#[derive(Debug, Default)]
pub struct Intake {
    pub pending: Vec<Delivery>,
    pub resend_candidates: Vec<Delivery>,
}

/// Builds delivery records for inbox documents.
pub struct Classifier<'a> {
    registry: &'a [Customer],
    ledger: &'a Ledger,
    scanner: IdentifierScanner,
    source: &'a dyn TextSource,
}

impl<'a> Classifier<'a> {
    pub fn new(
        registry: &'a [Customer],
        ledger: &'a Ledger,
        scanner: IdentifierScanner,
        source: &'a dyn TextSource,
    ) -> Self {
        Self {
            registry,
            ledger,
            scanner,
            source,
        }
    }

    /// Classify one document.
    ///
    /// Extraction failures come back as `RemessaError::Extraction` naming the
    /// file; ledger read failures are fatal and propagate as-is.
    pub fn classify_file(&self, inbox_dir: &Path, file_name: &str) -> Result<Classification> {
        let path = inbox_dir.join(file_name);
        let data = fs::read(&path).map_err(|e| RemessaError::Extraction {
            file: file_name.to_string(),
            source: ExtractionError::Read(e.to_string()),
        })?;

        let fragments = self
            .source
            .fragments(&data)
            .map_err(|source| RemessaError::Extraction {
                file: file_name.to_string(),
                source,
            })?;

        let identifiers = self.scanner.scan(&fragments);

        let mut delivery = Delivery::new(file_name, content_hash(&data));
        delivery.invoice_number = identifiers.invoice_number;
        delivery.tax_id = identifiers.tax_id;

        let Some(tax_id) = delivery.tax_id.clone() else {
            debug!("{file_name} carries no CPF/CNPJ");
            return Ok(Classification::MissingIdentifier(delivery));
        };

        let Some(customer) = find_by_id(self.registry, &tax_id) else {
            debug!("customer {tax_id} not in registry ({file_name})");
            return Ok(Classification::UnmatchedCustomer(delivery));
        };
        delivery.customer = Some(customer.clone());

        if self.ledger.contains(&delivery.content_hash)? {
            debug!("hash {} already delivered", delivery.content_hash);
            Ok(Classification::ResendCandidate(delivery))
        } else {
            Ok(Classification::Pending(delivery))
        }
    }

    /// Classify every regular file in the inbox, in name order.
    ///
    /// Terminal buckets are filled directly; pending deliveries and resend
    /// candidates come back for the later stages. A failed directory listing
    /// is fatal; a failed extraction only skips that document.
    pub fn classify_inbox(&self, inbox_dir: &Path, outcomes: &mut RunOutcomes) -> Result<Intake> {
        let mut names: Vec<String> = fs::read_dir(inbox_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| match entry.file_name().into_string() {
                Ok(name) => Some(name),
                Err(raw) => {
                    warn!(
                        "skipping {}: file name is not valid UTF-8",
                        raw.to_string_lossy()
                    );
                    None
                }
            })
            .collect();
        names.sort();

        let mut intake = Intake::default();
        for name in names {
            match self.classify_file(inbox_dir, &name) {
                Ok(Classification::Pending(d)) => intake.pending.push(d),
                Ok(Classification::ResendCandidate(d)) => intake.resend_candidates.push(d),
                Ok(Classification::MissingIdentifier(d)) => outcomes.missing_identifier.push(d),
                Ok(Classification::UnmatchedCustomer(d)) => outcomes.unmatched_customer.push(d),
                Err(err @ RemessaError::Extraction { .. }) => error!("{err}, skipping"),
                Err(fatal) => return Err(fatal),
            }
        }
        Ok(intake)
    }
}
