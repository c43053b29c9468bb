use std::fmt;

use sha2::{Digest, Sha256};

use crate::models::error::WavError;
use crate::models::recording_result::RecordingMetadata;
use crate::processing::wav_format::{self, WavHeader, WAV_HEADER_SIZE};
use crate::storage::portable_text;

/// A complete WAV buffer: 44-byte header followed by the PCM payload.
///
/// Immutable after construction. Every property is read from the header on
/// demand, so nothing can drift from the bytes.
///
/// Time-based queries (`index_for_time`, `crop`, `average`, `histogram`)
/// require a positive duration; on an empty or rate-less sound they treat
/// every time as index 0.
///
/// ## Payload encoding
///
/// Sample readers understand 16-bit signed little-endian and 8-bit unsigned
/// (zero at 128) payloads. Other bit depths are carried byte-for-byte by
/// `crop` and the transports, but `get_sample` reports them as `NaN`.
#[derive(Clone, PartialEq, Eq)]
pub struct Sound {
    bytes: Vec<u8>,
}

impl Sound {
    /// Wrap an existing buffer. No validation is performed.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Wrap an existing buffer after checking its header with [`WavHeader::parse`].
    pub fn from_bytes_checked(bytes: Vec<u8>) -> Result<Self, WavError> {
        WavHeader::parse(&bytes)?;
        Ok(Self { bytes })
    }

    /// Decode standard base64 text. The decoded bytes are not validated.
    pub fn from_portable_text(text: &str) -> Result<Self, WavError> {
        Ok(Self::from_bytes(portable_text::decode(text)?))
    }

    /// Decode standard base64 text and validate the resulting header.
    pub fn from_portable_text_checked(text: &str) -> Result<Self, WavError> {
        Self::from_bytes_checked(portable_text::decode(text)?)
    }

    pub fn to_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn to_portable_text(&self) -> String {
        portable_text::encode(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn header(&self) -> WavHeader {
        WavHeader::read(&self.bytes)
    }

    /// PCM bytes following the header.
    pub fn payload(&self) -> &[u8] {
        self.bytes.get(WAV_HEADER_SIZE..).unwrap_or(&[])
    }

    pub fn sample_rate(&self) -> u32 {
        wav_format::read_sample_rate(&self.bytes)
    }

    pub fn channels(&self) -> u16 {
        wav_format::read_channels(&self.bytes)
    }

    pub fn bits_per_sample(&self) -> u16 {
        wav_format::read_bits_per_sample(&self.bytes)
    }

    pub fn sample_count(&self) -> u32 {
        wav_format::read_sample_count(&self.bytes)
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        wav_format::read_duration(&self.bytes)
    }

    /// Normalized sample at frame `index` of `channel`.
    ///
    /// Returns `NaN` when the bit depth is neither 8 nor 16, when `channel`
    /// is not below the channel count, or when the position lies outside the
    /// buffer. Check with `f64::is_nan` before using the value.
    pub fn get_sample(&self, index: usize, channel: usize) -> f64 {
        let channels = self.channels() as usize;
        if channel >= channels {
            return f64::NAN;
        }
        let bytes_per_sample = match self.bits_per_sample() {
            8 => 1,
            16 => 2,
            _ => return f64::NAN,
        };
        let offset = index
            .checked_mul(channels)
            .and_then(|v| v.checked_add(channel))
            .and_then(|v| v.checked_mul(bytes_per_sample))
            .and_then(|v| v.checked_add(WAV_HEADER_SIZE));
        let Some(offset) = offset else {
            return f64::NAN;
        };

        match bytes_per_sample {
            1 => match self.bytes.get(offset) {
                Some(&byte) => (byte as f64 - 128.0) / 128.0,
                None => f64::NAN,
            },
            _ => match self.bytes.get(offset..offset + 2) {
                Some(b) => i16::from_le_bytes([b[0], b[1]]) as f64 / 32768.0,
                None => f64::NAN,
            },
        }
    }

    /// Map a time in seconds to a frame index in `[0, sample_count]`.
    ///
    /// Any time at or past the duration maps to `sample_count`, so the end
    /// of the sound is never lost to rounding.
    pub fn index_for_time(&self, time: f64) -> usize {
        let samples = self.sample_count() as f64;
        let duration = self.duration();
        if duration > 0.0 && time >= duration {
            return samples as usize;
        }
        let raw = (samples * time / duration).floor();
        // f64::max discards NaN, so an undefined ratio lands on 0.
        raw.max(0.0).min(samples) as usize
    }

    /// Copy the frames between `start` and `end` seconds into a new sound.
    ///
    /// A reversed range produces an empty sound. Frames the header claims
    /// but the buffer lacks are left out, so the result never holds more
    /// than the payload actually present. The result shares no storage
    /// with `self`.
    pub fn crop(&self, start: f64, end: f64) -> Sound {
        let start_idx = self.index_for_time(start);
        let end_idx = self.index_for_time(end);

        let header = self.header();
        let block_size = header.block_align() as usize;
        let present = match block_size {
            0 => usize::MAX,
            block => self.payload().len().saturating_sub(start_idx * block) / block,
        };
        let copy_count = end_idx.saturating_sub(start_idx).min(present);
        let copy_bytes = copy_count * block_size;

        let mut bytes = vec![0u8; WAV_HEADER_SIZE + copy_bytes];
        wav_format::write_defaults(&mut bytes);
        wav_format::write_fields(
            &mut bytes,
            copy_count as u32,
            header.sample_rate,
            header.bits_per_sample,
            header.channels,
        );

        let source = self.bytes.get(WAV_HEADER_SIZE + start_idx * block_size..).unwrap_or(&[]);
        bytes[WAV_HEADER_SIZE..].copy_from_slice(&source[..copy_bytes]);

        Sound::from_bytes(bytes)
    }

    /// Mean absolute sample value over `[start, end)` across all channels.
    ///
    /// Returns 0 for an empty range.
    pub fn average(&self, start: f64, end: f64) -> f64 {
        let (count, sum) = self.fold_range(start, end, 0.0, |acc, s| acc + s.abs());
        if count == 0 {
            return 0.0;
        }
        sum / count as f64
    }

    /// Largest absolute sample value over `[start, end)`, 0 for an empty range.
    pub fn peak(&self, start: f64, end: f64) -> f64 {
        let (_, peak) = self.fold_range(start, end, 0.0, |acc, s| acc.max(s.abs()));
        peak
    }

    /// Root-mean-square level over `[start, end)`, 0 for an empty range.
    pub fn rms(&self, start: f64, end: f64) -> f64 {
        let (count, sum_sq) = self.fold_range(start, end, 0.0, |acc, s| acc + s * s);
        if count == 0 {
            return 0.0;
        }
        (sum_sq / count as f64).sqrt()
    }

    /// Split `[0, duration)` into `buckets` equal time slices and average each.
    ///
    /// `buckets` must be positive; 0 yields an empty vector. The last bucket
    /// always ends at the full duration.
    pub fn histogram(&self, buckets: usize) -> Vec<f64> {
        let duration = self.duration();
        let slice = duration / buckets as f64;
        (0..buckets)
            .map(|i| {
                let end = if i + 1 == buckets { duration } else { (i + 1) as f64 * slice };
                self.average(i as f64 * slice, end)
            })
            .collect()
    }

    /// SHA-256 hex digest of the whole buffer.
    pub fn checksum(&self) -> String {
        let digest = Sha256::digest(&self.bytes);
        digest.iter().map(|b| format!("{:02x}", b)).collect()
    }

    pub fn metadata(&self, label: Option<String>) -> RecordingMetadata {
        RecordingMetadata::for_sound(self, label)
    }

    /// Fold every sample of every channel in the index range of `[start, end)`.
    ///
    /// Returns the number of samples visited with the folded value.
    fn fold_range<F>(&self, start: f64, end: f64, init: f64, mut f: F) -> (usize, f64)
    where
        F: FnMut(f64, f64) -> f64,
    {
        let start_idx = self.index_for_time(start);
        let end_idx = self.index_for_time(end);
        let channels = self.channels() as usize;
        let mut acc = init;
        for index in start_idx..end_idx.max(start_idx) {
            for channel in 0..channels {
                acc = f(acc, self.get_sample(index, channel));
            }
        }
        (end_idx.saturating_sub(start_idx) * channels, acc)
    }
}

impl fmt::Debug for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sound")
            .field("len", &self.bytes.len())
            .field("sample_rate", &self.sample_rate())
            .field("channels", &self.channels())
            .field("bits_per_sample", &self.bits_per_sample())
            .field("sample_count", &self.sample_count())
            .finish()
    }
}
