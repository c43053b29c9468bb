use super::error::WavError;

/// One delivery of planar audio from a capture source.
///
/// Each entry of `channels` holds the samples of one channel; all entries
/// have the same length. Samples are nominally in `[-1.0, 1.0]`.
#[derive(Debug, Clone, Copy)]
pub struct FrameBatch<'a> {
    /// Sample rate reported by the source, in Hz.
    pub sample_rate: f64,
    pub channels: &'a [&'a [f32]],
}

impl<'a> FrameBatch<'a> {
    pub fn new(sample_rate: f64, channels: &'a [&'a [f32]]) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Per-channel sample count.
    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, |c| c.len())
    }

    /// Check that every channel carries the same number of samples.
    pub fn validate(&self) -> Result<(), WavError> {
        let frames = self.frame_count();
        if let Some((index, channel)) = self
            .channels
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != frames)
        {
            return Err(WavError::MalformedBatch(format!(
                "channel {} has {} samples, channel 0 has {}",
                index,
                channel.len(),
                frames
            )));
        }
        Ok(())
    }
}

/// Interleaved 16-bit little-endian PCM produced from one frame batch.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmChunk {
    bytes: Box<[u8]>,
    frames: usize,
}

impl PcmChunk {
    pub fn new(bytes: Vec<u8>, frames: usize) -> Self {
        Self {
            bytes: bytes.into_boxed_slice(),
            frames,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of interleaved sample frames in this chunk.
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Counters for debugging capture sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureDiagnostics {
    pub batches_received: u64,
    pub batches_discarded: u64,
    pub batches_rejected: u64,
    pub bytes_buffered: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_count_uses_first_channel() {
        let left = [0.0f32; 4];
        let right = [0.0f32; 4];
        let channels: [&[f32]; 2] = [&left, &right];
        let batch = FrameBatch::new(48000.0, &channels);

        assert_eq!(batch.channel_count(), 2);
        assert_eq!(batch.frame_count(), 4);
        assert!(batch.validate().is_ok());
    }

    #[test]
    fn empty_batch_has_no_frames() {
        let batch = FrameBatch::new(48000.0, &[]);
        assert_eq!(batch.frame_count(), 0);
        assert!(batch.validate().is_ok());
    }

    #[test]
    fn unequal_channels_are_malformed() {
        let left = [0.0f32; 4];
        let right = [0.0f32; 3];
        let channels: [&[f32]; 2] = [&left, &right];
        let batch = FrameBatch::new(48000.0, &channels);

        let err = batch.validate().unwrap_err();
        assert_eq!(
            err,
            WavError::MalformedBatch("channel 1 has 3 samples, channel 0 has 4".into())
        );
    }

    #[test]
    fn chunk_reports_sizes() {
        let chunk = PcmChunk::new(vec![0u8; 8], 2);
        assert_eq!(chunk.len(), 8);
        assert_eq!(chunk.frame_count(), 2);
        assert!(!chunk.is_empty());
    }
}
