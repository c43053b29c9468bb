//! WAV container header codec.
//!
//! Encodes and decodes the canonical 44-byte RIFF header that precedes a
//! linear PCM payload. The free functions operate in place on a byte buffer
//! and perform no validation; [`WavHeader::parse`] is the strict decoder.
//!
//! Layout (all fields little-endian):
//! ```text
//! [0-3]    "RIFF"
//! [4-7]    total size = data_size + 36
//! [8-11]   "WAVE"
//! [12-15]  "fmt "
//! [16-19]  16 (PCM format chunk size)
//! [20-21]  1 (PCM format code)
//! [22-23]  channels
//! [24-27]  sample_rate
//! [28-31]  byte_rate = sample_rate * channels * bits_per_sample / 8
//! [32-33]  block_align = channels * bits_per_sample / 8
//! [34-35]  bits_per_sample
//! [36-39]  "data"
//! [40-43]  data_size
//! ```

use crate::models::error::WavError;

/// Size of the standard WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// Audio format code for linear PCM.
pub const PCM_FORMAT_CODE: u16 = 1;

/// Length of the PCM `fmt ` chunk body.
pub const FMT_CHUNK_LEN: u32 = 16;

const RIFF_TAG: &[u8; 4] = b"RIFF";
const WAVE_TAG: &[u8; 4] = b"WAVE";
const FMT_TAG: &[u8; 4] = b"fmt ";
const DATA_TAG: &[u8; 4] = b"data";

const OFFSET_TOTAL_SIZE: usize = 4;
const OFFSET_FMT_LEN: usize = 16;
const OFFSET_FORMAT_CODE: usize = 20;
const OFFSET_CHANNELS: usize = 22;
const OFFSET_SAMPLE_RATE: usize = 24;
const OFFSET_BYTE_RATE: usize = 28;
const OFFSET_BLOCK_ALIGN: usize = 32;
const OFFSET_BITS_PER_SAMPLE: usize = 34;
const OFFSET_DATA_SIZE: usize = 40;

/// Write the fixed tags: container, format, chunk ids, fmt length and PCM code.
///
/// Size, rate and channel fields are left untouched.
///
/// # Panics
///
/// Panics if `header` is shorter than [`WAV_HEADER_SIZE`].
pub fn write_defaults(header: &mut [u8]) {
    header[0..4].copy_from_slice(RIFF_TAG);
    header[8..12].copy_from_slice(WAVE_TAG);
    header[12..16].copy_from_slice(FMT_TAG);
    header[16..20].copy_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
    header[20..22].copy_from_slice(&PCM_FORMAT_CODE.to_le_bytes());
    header[36..40].copy_from_slice(DATA_TAG);
}

/// Write the size, rate and layout fields for `sample_count` frames.
///
/// Tag fields are not rewritten; call [`write_defaults`] first on a fresh buffer.
///
/// # Panics
///
/// Panics if `header` is shorter than [`WAV_HEADER_SIZE`].
pub fn write_fields(
    header: &mut [u8],
    sample_count: u32,
    sample_rate: u32,
    bits_per_sample: u16,
    channels: u16,
) {
    let block_align = channels as u32 * bits_per_sample as u32 / 8;
    let data_size = (sample_count as u64 * block_align as u64) as u32;
    let byte_rate = (sample_rate as u64 * block_align as u64) as u32;
    let total_size = data_size.wrapping_add(36);

    header[4..8].copy_from_slice(&total_size.to_le_bytes());
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&(block_align as u16).to_le_bytes());
    header[34..36].copy_from_slice(&bits_per_sample.to_le_bytes());
    header[40..44].copy_from_slice(&data_size.to_le_bytes());
}

pub fn read_bits_per_sample(bytes: &[u8]) -> u16 {
    read_u16(bytes, OFFSET_BITS_PER_SAMPLE)
}

pub fn read_channels(bytes: &[u8]) -> u16 {
    read_u16(bytes, OFFSET_CHANNELS)
}

pub fn read_sample_rate(bytes: &[u8]) -> u32 {
    read_u32(bytes, OFFSET_SAMPLE_RATE)
}

pub fn read_data_size(bytes: &[u8]) -> u32 {
    read_u32(bytes, OFFSET_DATA_SIZE)
}

/// Frames in the payload: `data_size / (bits_per_sample * channels / 8)`.
///
/// Returns 0 when the header describes a zero-byte block.
pub fn read_sample_count(bytes: &[u8]) -> u32 {
    let block_align = read_bits_per_sample(bytes) as u32 * read_channels(bytes) as u32 / 8;
    if block_align == 0 {
        return 0;
    }
    read_data_size(bytes) / block_align
}

/// Duration in seconds. Not finite when the sample rate is 0.
pub fn read_duration(bytes: &[u8]) -> f64 {
    read_sample_count(bytes) as f64 / read_sample_rate(bytes) as f64
}

/// Little-endian u16 at `offset`, or 0 past the end of `bytes`.
pub(crate) fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    bytes
        .get(offset..offset + 2)
        .map_or(0, |b| u16::from_le_bytes([b[0], b[1]]))
}

/// Little-endian u32 at `offset`, or 0 past the end of `bytes`.
pub(crate) fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    bytes
        .get(offset..offset + 4)
        .map_or(0, |b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Logical view of the header fields that vary between files.
///
/// The tag fields are constants and the derived fields (byte rate, block
/// align, total size) are computed from the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub channels: u16,
    pub data_size: u32,
}

impl WavHeader {
    pub fn new(sample_count: u32, sample_rate: u32, bits_per_sample: u16, channels: u16) -> Self {
        let block_align = channels as u64 * bits_per_sample as u64 / 8;
        Self {
            sample_rate,
            bits_per_sample,
            channels,
            data_size: (sample_count as u64 * block_align) as u32,
        }
    }

    /// Read the header fields from `bytes` without validating anything.
    pub fn read(bytes: &[u8]) -> Self {
        Self {
            sample_rate: read_sample_rate(bytes),
            bits_per_sample: read_bits_per_sample(bytes),
            channels: read_channels(bytes),
            data_size: read_data_size(bytes),
        }
    }

    /// Strictly decode the header at the start of `bytes`.
    ///
    /// Checks tags, PCM format, field consistency, and that the payload
    /// described by the header is present.
    pub fn parse(bytes: &[u8]) -> Result<Self, WavError> {
        if bytes.len() < WAV_HEADER_SIZE {
            return Err(malformed(format!(
                "buffer is {} bytes, header needs {}",
                bytes.len(),
                WAV_HEADER_SIZE
            )));
        }

        for (offset, tag) in [(0, RIFF_TAG), (8, WAVE_TAG), (12, FMT_TAG), (36, DATA_TAG)] {
            if &bytes[offset..offset + 4] != tag {
                return Err(malformed(format!(
                    "expected {:?} at offset {}",
                    String::from_utf8_lossy(tag),
                    offset
                )));
            }
        }

        let fmt_len = read_u32(bytes, OFFSET_FMT_LEN);
        if fmt_len != FMT_CHUNK_LEN {
            return Err(malformed(format!("fmt chunk length is {}, expected 16", fmt_len)));
        }
        let format_code = read_u16(bytes, OFFSET_FORMAT_CODE);
        if format_code != PCM_FORMAT_CODE {
            return Err(malformed(format!("audio format {} is not PCM", format_code)));
        }

        let header = Self::read(bytes);
        if header.channels == 0 {
            return Err(malformed("channel count is 0".into()));
        }
        if header.bits_per_sample == 0 || header.bits_per_sample % 8 != 0 {
            return Err(malformed(format!(
                "unsupported bits per sample: {}",
                header.bits_per_sample
            )));
        }
        if header.sample_rate == 0 {
            return Err(malformed("sample rate is 0".into()));
        }

        let block_align = read_u16(bytes, OFFSET_BLOCK_ALIGN) as u32;
        if block_align != header.block_align() {
            return Err(malformed(format!(
                "block align is {}, expected {}",
                block_align,
                header.block_align()
            )));
        }
        let byte_rate = read_u32(bytes, OFFSET_BYTE_RATE);
        if byte_rate != header.byte_rate() {
            return Err(malformed(format!(
                "byte rate is {}, expected {}",
                byte_rate,
                header.byte_rate()
            )));
        }
        let total_size = read_u32(bytes, OFFSET_TOTAL_SIZE);
        if total_size != header.total_size() {
            return Err(malformed(format!(
                "RIFF size is {}, expected {}",
                total_size,
                header.total_size()
            )));
        }
        if header.data_size % block_align != 0 {
            return Err(malformed(format!(
                "data size {} is not a multiple of block align {}",
                header.data_size, block_align
            )));
        }

        let payload = bytes.len() - WAV_HEADER_SIZE;
        if (header.data_size as usize) > payload {
            return Err(malformed(format!(
                "data size is {} but only {} payload bytes follow the header",
                header.data_size, payload
            )));
        }

        Ok(header)
    }

    pub fn block_align(&self) -> u32 {
        self.channels as u32 * self.bits_per_sample as u32 / 8
    }

    pub fn byte_rate(&self) -> u32 {
        (self.sample_rate as u64 * self.block_align() as u64) as u32
    }

    pub fn total_size(&self) -> u32 {
        self.data_size.wrapping_add(36)
    }

    pub fn sample_count(&self) -> u32 {
        match self.block_align() {
            0 => 0,
            block => self.data_size / block,
        }
    }

    pub fn duration(&self) -> f64 {
        self.sample_count() as f64 / self.sample_rate as f64
    }

    /// Write this header into the first 44 bytes of `buffer`.
    ///
    /// # Panics
    ///
    /// Panics if `buffer` is shorter than [`WAV_HEADER_SIZE`].
    pub fn write_to(&self, buffer: &mut [u8]) {
        write_defaults(buffer);
        write_fields(
            buffer,
            self.sample_count(),
            self.sample_rate,
            self.bits_per_sample,
            self.channels,
        );
    }

    pub fn encode(&self) -> [u8; WAV_HEADER_SIZE] {
        let mut header = [0u8; WAV_HEADER_SIZE];
        self.write_to(&mut header);
        header
    }
}

fn malformed(reason: String) -> WavError {
    WavError::MalformedInput(reason)
}
