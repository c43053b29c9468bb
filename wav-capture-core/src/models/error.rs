use thiserror::Error;

use super::state::CaptureState;

/// Errors raised by the capture sink and the WAV codec.
///
/// Unsupported bit depths and empty analysis ranges are not errors: they are
/// reported through `NaN` and `0.0` respectively so per-sample loops stay
/// branch-free.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WavError {
    #[error("invalid state: cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: CaptureState,
    },

    #[error(
        "format mismatch: stream is {expected_rate} Hz x {expected_channels} ch, batch is {rate} Hz x {channels} ch"
    )]
    FormatMismatch {
        expected_rate: u32,
        expected_channels: u16,
        rate: u32,
        channels: u16,
    },

    #[error("malformed frame batch: {0}")]
    MalformedBatch(String),

    #[error("recording exceeds the WAV size limit: {0} data bytes")]
    TooLarge(u64),

    #[error("malformed WAV input: {0}")]
    MalformedInput(String),

    #[error("invalid portable text: {0}")]
    InvalidPortableText(String),

    #[error("configuration failed: {0}")]
    Configuration(String),

    #[error("capture provider error: {0}")]
    Provider(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl WavError {
    pub(crate) fn invalid_state(operation: &'static str, state: CaptureState) -> Self {
        Self::InvalidState { operation, state }
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }
}
