//! CRC32 checksum computation for collection log lines
//!
//! - Every replayed line validates its checksum
//! - Any checksum failure during open → open aborts
//!
//! Uses CRC32 (IEEE polynomial) for checksums.

use crc32fast::Hasher;

/// Computes a CRC32 checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Verifies that the computed checksum matches the expected checksum.
pub fn verify_checksum(data: &[u8], expected: u32) -> bool {
    compute_checksum(data) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_deterministic() {
        let data = br#"{"id":1,"op":"insert","record":{"loan_id":"LP001002"}}"#;
        assert_eq!(compute_checksum(data), compute_checksum(data));
    }

    #[test]
    fn test_checksum_detects_corruption() {
        let mut data = b"LP001002".to_vec();
        let original = compute_checksum(&data);
        data[7] = b'3';
        assert_ne!(original, compute_checksum(&data));
    }

    #[test]
    fn test_verify_checksum() {
        let data = b"loan_applications";
        let checksum = compute_checksum(data);
        assert!(verify_checksum(data, checksum));
        assert!(!verify_checksum(data, checksum ^ 1));
    }
}
