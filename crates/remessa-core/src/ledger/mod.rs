//! Dedup ledger: content hashes of documents already delivered.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::LedgerError;

/// Append-only, line-oriented store of delivered content hashes.
///
/// A hash in the ledger means a document with that exact content has been
/// delivered at least once. The file is truncated to a configured tail at
/// run start, so the dedup window is bounded, not unbounded.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a hash is present. A missing ledger file means no hash has
    /// ever been recorded.
    pub fn contains(&self, hash: &str) -> Result<bool, LedgerError> {
        if !self.path.exists() {
            return Ok(false);
        }
        let content = fs::read_to_string(&self.path).map_err(|source| LedgerError::Read {
            path: self.path.clone(),
            source,
        })?;
        Ok(content.lines().any(|line| line == hash))
    }

    /// Record a hash, creating the file and parent directories on demand.
    ///
    /// Already-present hashes are not appended again, so a hash appears at
    /// most once between truncations.
    pub fn append(&self, hash: &str) -> Result<(), LedgerError> {
        if self.contains(hash)? {
            debug!("hash {hash} already in ledger, not appending");
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| LedgerError::Append {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| LedgerError::Append {
                path: self.path.clone(),
                source,
            })?;

        writeln!(file, "{hash}").map_err(|source| LedgerError::Append {
            path: self.path.clone(),
            source,
        })
    }

    /// Drop the oldest entries so at most `max_lines` remain, preserving
    /// order. A missing file is left alone.
    pub fn truncate_tail(&self, max_lines: usize) -> Result<(), LedgerError> {
        truncate_file_tail(&self.path, max_lines).map_err(|source| LedgerError::Truncate {
            path: self.path.clone(),
            source,
        })
    }
}

/// Rewrite a line-oriented file keeping only the newest `max_lines` lines.
///
/// Shared by the ledger and the run log.
pub fn truncate_file_tail(path: &Path, max_lines: usize) -> std::io::Result<()> {
    if !path.exists() {
        return Ok(());
    }

    let content = fs::read_to_string(path)?;
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() <= max_lines {
        return Ok(());
    }

    let tail = &lines[lines.len() - max_lines..];
    let mut rewritten = tail.join("\n");
    rewritten.push('\n');
    fs::write(path, rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn temp_ledger() -> (tempfile::TempDir, Ledger) {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("hashes.txt"));
        (dir, ledger)
    }

    #[test]
    fn missing_file_contains_nothing() {
        let (_dir, ledger) = temp_ledger();
        assert!(!ledger.contains("abc").unwrap());
    }

    #[test]
    fn append_then_contains() {
        let (_dir, ledger) = temp_ledger();
        ledger.append("abc").unwrap();
        ledger.append("def").unwrap();
        assert!(ledger.contains("abc").unwrap());
        assert!(ledger.contains("def").unwrap());
        assert!(!ledger.contains("ghi").unwrap());
    }

    #[test]
    fn append_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("state").join("hashes.txt"));
        ledger.append("abc").unwrap();
        assert!(ledger.contains("abc").unwrap());
    }

    #[test]
    fn duplicate_append_is_recorded_once() {
        let (_dir, ledger) = temp_ledger();
        ledger.append("abc").unwrap();
        ledger.append("abc").unwrap();

        let content = fs::read_to_string(ledger.path()).unwrap();
        assert_eq!(content.lines().filter(|l| *l == "abc").count(), 1);
    }

    #[test]
    fn truncation_keeps_last_lines_in_order() {
        let (_dir, ledger) = temp_ledger();
        for i in 0..400 {
            ledger.append(&format!("hash-{i}")).unwrap();
        }

        ledger.truncate_tail(300).unwrap();

        let content = fs::read_to_string(ledger.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 300);
        assert_eq!(lines[0], "hash-100");
        assert_eq!(lines[299], "hash-399");
    }

    #[test]
    fn truncation_leaves_short_files_untouched() {
        let (_dir, ledger) = temp_ledger();
        ledger.append("abc").unwrap();
        ledger.truncate_tail(300).unwrap();
        assert!(ledger.contains("abc").unwrap());
    }

    #[test]
    fn truncation_of_missing_file_is_a_noop() {
        let (_dir, ledger) = temp_ledger();
        ledger.truncate_tail(300).unwrap();
        assert!(!ledger.path().exists());
    }
}
