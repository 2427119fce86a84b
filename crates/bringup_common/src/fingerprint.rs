//! Content fingerprints for checking that composition output is reproducible.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit XXH3 fingerprint of some serialized output.
///
/// Two compositions with the same `Fingerprint` rendered to byte-identical
/// canonical JSON.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint([u8; 16]);

impl Fingerprint {
    /// Computes a fingerprint from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Serializes `value` to compact JSON and fingerprints the bytes.
    pub fn of_json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        let bytes = serde_json::to_vec(value)?;
        Ok(Self::from_bytes(&bytes))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_value_same_fingerprint() {
        let a = Fingerprint::of_json(&vec!["sys", "sys_ps", "vga"]).unwrap();
        let b = Fingerprint::of_json(&vec!["sys", "sys_ps", "vga"]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn order_changes_fingerprint() {
        let a = Fingerprint::of_json(&vec!["sys", "vga"]).unwrap();
        let b = Fingerprint::of_json(&vec!["vga", "sys"]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_32_hex_chars() {
        let s = Fingerprint::from_bytes(b"de0cv").to_string();
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn debug_abbreviated() {
        let s = format!("{:?}", Fingerprint::from_bytes(b"de0cv"));
        assert!(s.starts_with("Fingerprint("));
        assert!(s.ends_with("..)"));
    }
}
