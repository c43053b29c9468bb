//! Base64 transport for embedding sound bytes in text-only channels.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::models::error::WavError;

/// Encode `bytes` with the standard base64 alphabet and padding.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard base64 text back into bytes.
pub fn decode(text: &str) -> Result<Vec<u8>, WavError> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| WavError::InvalidPortableText(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector() {
        assert_eq!(encode(b"RIFF"), "UklGRg==");
        assert_eq!(decode("UklGRg==").unwrap(), b"RIFF");
    }

    #[test]
    fn every_byte_value_survives() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(1031).collect();
        assert_eq!(decode(&encode(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(decode("  UklGRg==\n").unwrap(), b"RIFF");
    }

    #[test]
    fn rejects_non_base64() {
        let err = decode("not*base64").unwrap_err();
        assert!(matches!(err, WavError::InvalidPortableText(_)));
    }

    #[test]
    fn empty_round_trip() {
        assert_eq!(encode(&[]), "");
        assert!(decode("").unwrap().is_empty());
    }
}
