//! Customer registry records.

use serde::{Deserialize, Deserializer, Serialize};

/// A single customer from the registry file.
///
/// `id` is the formatted CPF/CNPJ and is the lookup key for matching
/// extracted identifiers. Records are immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "split_emails")]
    pub emails: Vec<String>,
}

/// The `emails` column holds a `;`-separated list of addresses.
fn split_emails<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}
