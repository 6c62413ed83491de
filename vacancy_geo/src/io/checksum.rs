//! Checksums recorded for every input file of a run.

use sha2::{Digest, Sha256};

/// Calculate the SHA-256 checksum of raw file content.
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn calculate_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let result = hasher.finalize();
    hex::encode(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let content = b"organization_location_name\nBerlin\n";
        assert_eq!(calculate_checksum(content), calculate_checksum(content));
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            calculate_checksum(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_different_content_different_checksum() {
        assert_ne!(calculate_checksum(b"Berlin"), calculate_checksum(b"Bonn"));
    }
}
