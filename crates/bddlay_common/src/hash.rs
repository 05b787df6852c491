//! Content hashing of input documents.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit XXH3 digest of an input document.
///
/// Stored in placement reports so a report can be matched to the exact
/// structural description it was produced from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Hashes a byte slice with XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Returns the lowercase hex form (32 characters).
    pub fn to_hex(&self) -> String {
        self.to_string()
    }

    /// First 8 hex characters, for log lines.
    pub fn short(&self) -> String {
        self.0[..4].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({}..)", self.short())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_document_same_hash() {
        let doc = b"[(0,1)]\n[(-2,-1)],[(-2,-1)]\n[0,1]\n";
        assert_eq!(ContentHash::from_bytes(doc), ContentHash::from_bytes(doc));
    }

    #[test]
    fn edited_document_differs() {
        let a = ContentHash::from_bytes(b"[(0,1)]\n[0]");
        let b = ContentHash::from_bytes(b"[(1,0)]\n[0]");
        assert_ne!(a, b);
    }

    #[test]
    fn hex_is_32_chars() {
        let h = ContentHash::from_bytes(b"[0]");
        let s = h.to_hex();
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn short_is_hex_prefix() {
        let h = ContentHash::from_bytes(b"[0]");
        assert_eq!(h.short().len(), 8);
        assert!(h.to_hex().starts_with(&h.short()));
        assert_eq!(format!("{h:?}"), format!("ContentHash({}..)", h.short()));
    }

    #[test]
    fn serde_roundtrip() {
        let h = ContentHash::from_bytes(b"layers");
        let json = serde_json::to_string(&h).unwrap();
        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }
}
