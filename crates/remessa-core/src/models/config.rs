//! Configuration structures for the dispatch pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::mailer::Security;

/// Main configuration for a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// File and directory locations.
    pub paths: PathsConfig,

    /// Retention limits for the flat-file stores.
    pub limits: LimitsConfig,

    /// Identifier extraction settings.
    pub extraction: ExtractionConfig,

    /// SMTP connection settings.
    pub smtp: SmtpSettings,

    /// Outgoing message settings.
    pub message: MessageSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            limits: LimitsConfig::default(),
            extraction: ExtractionConfig::default(),
            smtp: SmtpSettings::default(),
            message: MessageSettings::default(),
        }
    }
}

/// File and directory locations used by a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory scanned for invoice documents.
    pub inbox_dir: PathBuf,

    /// Root of the dated archive for delivered documents.
    pub archive_dir: PathBuf,

    /// Customer registry CSV.
    pub registry_file: PathBuf,

    /// Dedup ledger, one content hash per line.
    pub ledger_file: PathBuf,

    /// Append-only run log.
    pub log_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            inbox_dir: PathBuf::from("invoices"),
            archive_dir: PathBuf::from("sent"),
            registry_file: PathBuf::from("customers.csv"),
            ledger_file: PathBuf::from("hashes.txt"),
            log_file: PathBuf::from("remessa.log"),
        }
    }
}

/// Line budgets for the ledger and log files, applied at run start.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum ledger lines to retain; bounds the dedup window.
    pub ledger_max_lines: usize,

    /// Maximum log lines to retain.
    pub log_max_lines: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            ledger_max_lines: 300,
            log_max_lines: 5000,
        }
    }
}

/// Identifier extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// The operating company's own CPF/CNPJ. Occurrences in a document are
    /// never captured as a customer id.
    pub company_tax_id: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            company_tax_id: String::new(),
        }
    }
}

/// SMTP connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub security: Security,
    pub user: String,
    pub password: String,

    /// Pause after a connection-refused send failure, in seconds.
    pub refusal_pause_secs: u64,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 587,
            security: Security::StartTls,
            user: String::new(),
            password: String::new(),
            refusal_pause_secs: 5,
        }
    }
}

/// Outgoing message settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageSettings {
    /// Sender address.
    pub from: String,

    /// Display name on the From mailbox.
    pub sender_name: String,

    /// Subject prefix; the full subject is `"{prefix} - {customer} - NF: {n}"`.
    pub subject_prefix: String,

    /// Path to the fixed HTML body template.
    pub body_template: PathBuf,
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            from: String::new(),
            sender_name: String::new(),
            subject_prefix: "Boleto".to_string(),
            body_template: PathBuf::from("body.html"),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }

    /// Overlay settings from process environment variables.
    ///
    /// Credentials and connection settings are the ones typically supplied
    /// this way on unattended hosts.
    pub fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("REMESSA_SMTP_HOST") {
            self.smtp.host = host;
        }
        if let Ok(port) = std::env::var("REMESSA_SMTP_PORT") {
            if let Ok(port) = port.parse() {
                self.smtp.port = port;
            }
        }
        if let Ok(security) = std::env::var("REMESSA_SMTP_SECURITY") {
            if let Some(security) = Security::parse(&security) {
                self.smtp.security = security;
            }
        }
        if let Ok(user) = std::env::var("REMESSA_SMTP_USER") {
            self.smtp.user = user;
        }
        if let Ok(password) = std::env::var("REMESSA_SMTP_PASSWORD") {
            self.smtp.password = password;
        }
        if let Ok(from) = std::env::var("REMESSA_MAIL_FROM") {
            self.message.from = from;
        }
        if let Ok(name) = std::env::var("REMESSA_MAIL_SENDER_NAME") {
            self.message.sender_name = name;
        }
        if let Ok(subject) = std::env::var("REMESSA_MAIL_SUBJECT") {
            self.message.subject_prefix = subject;
        }
        if let Ok(template) = std::env::var("REMESSA_MAIL_TEMPLATE") {
            self.message.body_template = PathBuf::from(template);
        }
        if let Ok(company) = std::env::var("REMESSA_COMPANY_TAX_ID") {
            self.extraction.company_tax_id = company;
        }
    }
}
