//! Error types for the remessa-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the remessa library.
#[derive(Error, Debug)]
pub enum RemessaError {
    /// Customer registry could not be loaded. Fatal to the run.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Identifier extraction failed for a single document.
    #[error("extraction failed for {file}: {source}")]
    Extraction {
        file: String,
        #[source]
        source: ExtractionError,
    },

    /// Dedup ledger I/O error.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Mail building or transport error.
    #[error("mail error: {0}")]
    Mail(#[from] MailError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to reading the customer registry file.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Failed to open or read the registry file.
    #[error("failed to read registry {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A row could not be parsed at all.
    #[error("malformed registry row {row}: {reason}")]
    Row { row: usize, reason: String },

    /// A row parsed but a required field is missing or blank.
    #[error("registry row {row}: missing or blank field `{field}`")]
    MissingField { row: usize, field: &'static str },
}

/// Errors related to extracting text from a document.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Failed to read the document from disk.
    #[error("failed to read document: {0}")]
    Read(String),

    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Failed to extract text from the PDF.
    #[error("failed to extract text: {0}")]
    Text(String),
}

/// Errors related to the dedup ledger file.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Failed to read the ledger.
    #[error("failed to read ledger {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to append a hash to the ledger.
    #[error("failed to append to ledger {path}: {source}")]
    Append {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to truncate the ledger to its line budget.
    #[error("failed to truncate {path}: {source}")]
    Truncate {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors related to building and sending mail.
#[derive(Error, Debug)]
pub enum MailError {
    /// A recipient or sender address did not parse.
    #[error("invalid address `{address}`: {reason}")]
    Address { address: String, reason: String },

    /// The message could not be assembled.
    #[error("failed to build message: {0}")]
    Build(String),

    /// The attachment could not be read from the inbox.
    #[error("failed to read attachment {path}: {source}")]
    Attachment {
        path: PathBuf,
        source: std::io::Error,
    },

    /// SMTP transport failure.
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

impl MailError {
    /// Whether the failure ultimately came from a refused TCP connection.
    ///
    /// Used to throttle the pipeline when the mail server is flapping.
    pub fn is_connection_refused(&self) -> bool {
        let mut source: Option<&(dyn std::error::Error + 'static)> = Some(self);
        while let Some(err) = source {
            if let Some(io) = err.downcast_ref::<std::io::Error>() {
                if io.kind() == std::io::ErrorKind::ConnectionRefused {
                    return true;
                }
            }
            source = err.source();
        }
        false
    }
}

/// Result type for the remessa library.
pub type Result<T> = std::result::Result<T, RemessaError>;
