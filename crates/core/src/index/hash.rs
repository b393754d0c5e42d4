//! Content-addressed identifiers.

use sha2::{Digest, Sha256};

/// Compute the identifier for a piece of content: lowercase hex SHA-256.
pub fn content_identifier(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
