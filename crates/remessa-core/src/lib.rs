//! Core library for batch invoice e-mail dispatch.
//!
//! This crate provides:
//! - PDF text extraction into ordered fragments
//! - CPF/CNPJ and invoice-number extraction from document text
//! - Customer registry loading from CSV
//! - A hash-based dedup ledger with bounded retention
//! - Sequential delivery over SMTP with archive-on-success bookkeeping

pub mod error;
pub mod hash;
pub mod models;
pub mod pdf;
pub mod extract;
pub mod registry;
pub mod ledger;
pub mod mailer;
pub mod pipeline;

pub use error::{
    ExtractionError, LedgerError, MailError, RegistryError, RemessaError, Result,
};
pub use hash::content_hash;
pub use models::config::AppConfig;
pub use models::customer::Customer;
pub use models::delivery::{Delivery, PostSendAnomaly};
pub use pdf::{PdfTextSource, TextFragment, TextSource};
pub use extract::{ExtractedIdentifiers, IdentifierScanner, INVOICE_NUMBER_SENTINEL};
pub use registry::{find_by_id, load_registry};
pub use ledger::{Ledger, truncate_file_tail};
pub use mailer::{Mailer, OutgoingMessage, Security, SmtpMailer};
pub use pipeline::{
    Answer, Classification, Classifier, ConfirmPrompt, ConfirmationGate, Dispatcher, Intake,
    RunOutcomes, render_summary,
};
