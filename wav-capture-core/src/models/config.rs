/// Configuration for a capture sink.
///
/// Every field is optional tightening: the default configuration accepts
/// whatever format the first frame batch carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfiguration {
    /// Sample rate in Hz the stream must have, or None to take it from the first batch.
    pub expected_sample_rate: Option<u32>,

    /// Channel count the stream must have, or None to take it from the first batch.
    pub expected_channels: Option<u16>,

    /// Upper bound on the channel count of any batch (default: 8).
    pub max_channels: u16,

    /// Initial capacity of the chunk list (default: 64).
    pub chunk_capacity: usize,
}

impl SinkConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_channels == 0 {
            return Err("max channels must be positive".into());
        }
        if self.expected_sample_rate == Some(0) {
            return Err("expected sample rate must be positive".into());
        }
        if let Some(channels) = self.expected_channels {
            if channels == 0 {
                return Err("expected channel count must be positive".into());
            }
            if channels > self.max_channels {
                return Err(format!(
                    "expected channel count {} exceeds max channels {}",
                    channels, self.max_channels
                ));
            }
        }
        Ok(())
    }
}

impl Default for SinkConfiguration {
    fn default() -> Self {
        Self {
            expected_sample_rate: None,
            expected_channels: None,
            max_channels: 8,
            chunk_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(SinkConfiguration::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_rate_and_channels() {
        let config = SinkConfiguration {
            expected_sample_rate: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SinkConfiguration {
            expected_channels: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_expected_channels_above_max() {
        let config = SinkConfiguration {
            expected_channels: Some(4),
            max_channels: 2,
            ..Default::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            "expected channel count 4 exceeds max channels 2"
        );
    }
}
