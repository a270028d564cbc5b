//! Utility functions and helpers.

pub mod http;

use sha2::{Digest, Sha256};

/// Number of hex characters kept from a content digest.
const FINGERPRINT_LEN: usize = 12;

/// Short SHA-256 fingerprint of a text snapshot, for log lines.
pub fn fingerprint(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(FINGERPRINT_LEN);
    hex
}
