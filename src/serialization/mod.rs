//! AHR binary artifact format.
//!
//! Every snapshot artifact is one self-contained binary file:
//!
//! ```text
//! [4-byte magic: "AHR1"]
//! [4-byte payload_len: u32 little-endian]
//! [JSON payload: the serde-serialized model or transformer]
//! [4-byte CRC32: checksum of all preceding bytes]
//! ```
//!
//! The payload stays JSON so artifacts remain inspectable with standard
//! tools, while the magic and checksum catch truncation and mixups.

use crate::error::{AhorroError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Magic bytes for the AHR artifact format - "AHR1"
pub const AHR_MAGIC: [u8; 4] = [b'A', b'H', b'R', b'1'];

/// Computes the CRC32 (IEEE) checksum of a byte slice.
#[must_use]
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

/// Serializes a value into the AHR container bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn to_artifact_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let payload = serde_json::to_vec(value)
        .map_err(|e| AhorroError::Serialization(format!("encode payload: {e}")))?;

    let payload_len = u32::try_from(payload.len())
        .map_err(|_| AhorroError::Serialization("payload exceeds u32 length".to_string()))?;

    let mut bytes = Vec::with_capacity(4 + 4 + payload.len() + 4);
    bytes.extend_from_slice(&AHR_MAGIC);
    bytes.extend_from_slice(&payload_len.to_le_bytes());
    bytes.extend_from_slice(&payload);

    let checksum = crc32(&bytes);
    bytes.extend_from_slice(&checksum.to_le_bytes());

    Ok(bytes)
}

/// Deserializes a value from AHR container bytes.
///
/// # Errors
///
/// Returns an error on bad magic, truncation, checksum mismatch, or a
/// payload that does not decode to `T`.
pub fn from_artifact_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    if bytes.len() < 12 {
        return Err(AhorroError::Serialization(format!(
            "artifact truncated: {} bytes",
            bytes.len()
        )));
    }

    if bytes[0..4] != AHR_MAGIC {
        return Err(AhorroError::Serialization(
            "bad magic: not an AHR artifact".to_string(),
        ));
    }

    let payload_len = u32::from_le_bytes(
        bytes[4..8]
            .try_into()
            .expect("slice of fixed length 4"),
    ) as usize;

    let expected_len = 4 + 4 + payload_len + 4;
    if bytes.len() != expected_len {
        return Err(AhorroError::Serialization(format!(
            "artifact length mismatch: header says {expected_len} bytes, file has {}",
            bytes.len()
        )));
    }

    let body_end = bytes.len() - 4;
    let stored_crc = u32::from_le_bytes(
        bytes[body_end..]
            .try_into()
            .expect("slice of fixed length 4"),
    );
    let actual_crc = crc32(&bytes[..body_end]);
    if stored_crc != actual_crc {
        return Err(AhorroError::Serialization(format!(
            "checksum mismatch: stored {stored_crc:#010x}, computed {actual_crc:#010x}"
        )));
    }

    serde_json::from_slice(&bytes[8..body_end])
        .map_err(|e| AhorroError::Serialization(format!("decode payload: {e}")))
}

/// Writes a value to disk as an AHR artifact.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_artifact<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let bytes = to_artifact_bytes(value)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Reads a value from an AHR artifact on disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation.
pub fn load_artifact<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let bytes = fs::read(path)?;
    from_artifact_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        values: Vec<f32>,
    }

    fn sample() -> Sample {
        Sample {
            name: "scaler".to_string(),
            values: vec![1.0, 2.5, -3.0],
        }
    }

    #[test]
    fn test_crc32_known_value() {
        // CRC32("123456789") = 0xCBF43926 per the IEEE reference check
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_round_trip_bytes() {
        let value = sample();
        let bytes = to_artifact_bytes(&value).expect("encode");
        assert_eq!(&bytes[0..4], &AHR_MAGIC);
        let restored: Sample = from_artifact_bytes(&bytes).expect("decode");
        assert_eq!(restored, value);
    }

    #[test]
    fn test_round_trip_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("model.ahr");
        save_artifact(&sample(), &path).expect("save");
        let restored: Sample = load_artifact(&path).expect("load");
        assert_eq!(restored, sample());
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut bytes = to_artifact_bytes(&sample()).expect("encode");
        bytes[0] = b'X';
        let err = from_artifact_bytes::<Sample>(&bytes).expect_err("bad magic");
        assert!(err.to_string().contains("bad magic"));
    }

    #[test]
    fn test_truncated_rejected() {
        let bytes = to_artifact_bytes(&sample()).expect("encode");
        let err =
            from_artifact_bytes::<Sample>(&bytes[..bytes.len() - 3]).expect_err("truncated");
        assert!(matches!(err, AhorroError::Serialization(_)));
    }

    #[test]
    fn test_corrupted_payload_rejected() {
        let mut bytes = to_artifact_bytes(&sample()).expect("encode");
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0xFF;
        let err = from_artifact_bytes::<Sample>(&bytes).expect_err("corrupt");
        assert!(err.to_string().contains("checksum mismatch"));
    }

    #[test]
    fn test_tiny_file_rejected() {
        assert!(from_artifact_bytes::<Sample>(b"AHR1").is_err());
    }
}
