//! Content fingerprints for source images

use sha2::{Digest, Sha256};
use std::fmt;

const PREFIX: &str = "sha256:";

/// A SHA-256 hash of an asset's bytes.
///
/// Materials record the hash next to the texture path so a stale
/// reference (file replaced after generation) can be told apart.
#[derive(Clone, Copy, Hash, Eq, PartialEq)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Compute a hash from bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Get the hash as a hex string
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Get the hash as a prefixed hex string (e.g., "sha256:abcdef...")
    pub fn to_prefixed_hex(&self) -> String {
        format!("{}{}", PREFIX, self.to_hex())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_bytes_same_hash() {
        assert_eq!(
            ContentHash::from_bytes(b"rock albedo"),
            ContentHash::from_bytes(b"rock albedo")
        );
        assert_ne!(
            ContentHash::from_bytes(b"rock albedo"),
            ContentHash::from_bytes(b"rock normal")
        );
    }

    #[test]
    fn test_prefixed_hex() {
        let h = ContentHash::from_bytes(b"");
        assert_eq!(
            h.to_prefixed_hex(),
            "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(h.to_string(), "e3b0c44298fc1c14");
    }
}
