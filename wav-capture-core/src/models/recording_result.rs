use serde::{Deserialize, Serialize};

use super::error::WavError;
use crate::storage::sound::Sound;

/// Description of a finished recording.
///
/// Serializable for JSON export alongside the uploaded bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    pub id: String,
    pub label: Option<String>,
    pub created_at: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub sample_count: u32,
    pub duration_secs: f64,
    pub checksum: String,
}

impl RecordingMetadata {
    /// Creates metadata for `sound` with a fresh id and the current time.
    pub fn for_sound(sound: &Sound, label: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            label,
            created_at: chrono::Utc::now().to_rfc3339(),
            sample_rate: sound.sample_rate(),
            channels: sound.channels(),
            bits_per_sample: sound.bits_per_sample(),
            sample_count: sound.sample_count(),
            duration_secs: sound.duration(),
            checksum: sound.checksum(),
        }
    }

    /// Whether `sound` is the recording this metadata describes.
    pub fn matches(&self, sound: &Sound) -> bool {
        self.checksum == sound.checksum()
    }

    pub fn to_json(&self) -> Result<String, WavError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| WavError::Serialization(format!("failed to serialize metadata: {}", e)))
    }

    pub fn from_json(json: &str) -> Result<Self, WavError> {
        serde_json::from_str(json)
            .map_err(|e| WavError::Serialization(format!("failed to parse metadata: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::wav_format::WavHeader;

    fn tone() -> Sound {
        let mut bytes = WavHeader::new(4, 8000, 16, 1).encode().to_vec();
        for value in [0i16, 1000, -1000, 0] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        Sound::from_bytes(bytes)
    }

    #[test]
    fn describes_sound() {
        let sound = tone();
        let metadata = RecordingMetadata::for_sound(&sound, Some("hello".into()));

        assert_eq!(metadata.label.as_deref(), Some("hello"));
        assert_eq!(metadata.sample_rate, 8000);
        assert_eq!(metadata.channels, 1);
        assert_eq!(metadata.bits_per_sample, 16);
        assert_eq!(metadata.sample_count, 4);
        assert!((metadata.duration_secs - 0.0005).abs() < 1e-12);
        assert_eq!(metadata.checksum.len(), 64);
        assert!(metadata.matches(&sound));
        assert!(uuid::Uuid::parse_str(&metadata.id).is_ok());
    }

    #[test]
    fn json_round_trip() {
        let metadata = RecordingMetadata::for_sound(&tone(), None);
        let json = metadata.to_json().unwrap();
        assert!(json.contains("\"sample_rate\": 8000"));

        let parsed = RecordingMetadata::from_json(&json).unwrap();
        assert_eq!(parsed, metadata);
    }

    #[test]
    fn rejects_bad_json() {
        let err = RecordingMetadata::from_json("{").unwrap_err();
        assert!(matches!(err, WavError::Serialization(_)));
    }

    #[test]
    fn does_not_match_other_sound() {
        let metadata = RecordingMetadata::for_sound(&tone(), None);
        let other = Sound::from_bytes(WavHeader::new(0, 8000, 16, 1).encode().to_vec());
        assert!(!metadata.matches(&other));
    }
}
