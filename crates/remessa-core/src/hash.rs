//! Content hashing for dedup and delivery-receipt correlation.

use sha2::{Digest, Sha256};

/// SHA-256 hex digest of a document's bytes.
///
/// The same value serves as the ledger key and as the delivery-receipt
/// correlation id on outgoing messages.
pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hash_is_stable_for_identical_content() {
        assert_eq!(content_hash(b"boleto"), content_hash(b"boleto"));
    }

    #[test]
    fn hash_differs_for_different_content() {
        assert_ne!(content_hash(b"boleto-1"), content_hash(b"boleto-2"));
    }

    #[test]
    fn hash_is_lowercase_hex() {
        let h = content_hash(b"");
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
