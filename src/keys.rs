//! Key derivation - Maps arbitrary string keys to fixed-width filename stems
//!
//! Keys are caller-supplied strings (typically URLs) and may contain
//! characters that are unsafe or unbounded as filenames. Hashing gives every
//! entry a fixed-width, filesystem-safe, evenly distributed name.

use xxhash_rust::xxh3::xxh3_128;

/// Width of a derived key in hex characters (128 bits)
pub const DERIVED_WIDTH: usize = 32;

/// Derive the filename stem for a cache key
pub fn derive(key: &str) -> String {
    format!("{:032x}", xxh3_128(key.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_deterministic() {
        assert_eq!(derive("https://example.com/a"), derive("https://example.com/a"));
    }

    #[test]
    fn test_derive_fixed_width() {
        let inputs = [
            "".to_string(),
            "x".to_string(),
            "https://example.com/path?query=1&other=2".to_string(),
            "k".repeat(100_000),
        ];
        for input in &inputs {
            let derived = derive(input);
            assert_eq!(derived.len(), DERIVED_WIDTH);
            assert!(derived.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_derive_distinct_keys() {
        assert_ne!(derive("https://example.com/a"), derive("https://example.com/b"));
        assert_ne!(derive("a"), derive("a "));
    }
}
