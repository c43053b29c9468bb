//! Float to 16-bit PCM quantization.
//!
//! Samples are scaled by 32768 and rounded with halves going up, so `-1.0`
//! maps to `i16::MIN` exactly. Values are not clamped: anything that rounds
//! outside the `i16` range wraps modulo 2^16 (`1.0` becomes `-32768`).
//! Non-finite samples quantize to silence.

/// Full-scale magnitude of a 16-bit sample.
pub const PCM16_SCALE: f64 = 32768.0;

/// Quantize one float sample to a signed 16-bit value.
pub fn quantize_i16(sample: f32) -> i16 {
    let scaled = (sample as f64 * PCM16_SCALE + 0.5).floor();
    if !scaled.is_finite() {
        return 0;
    }
    // Float-to-int casts saturate, so reduce modulo 2^16 before narrowing.
    scaled.rem_euclid(65536.0) as u16 as i16
}

/// Interleave planar channels into 16-bit little-endian PCM bytes.
///
/// Output is channel-minor: every channel of frame 0, then frame 1, and so
/// on. All channels must have the same length; the first channel's length
/// decides the frame count.
pub fn planar_to_pcm16(channels: &[&[f32]]) -> Vec<u8> {
    let frames = channels.first().map_or(0, |c| c.len());
    let mut data = Vec::with_capacity(frames * channels.len() * 2);
    for frame in 0..frames {
        for channel in channels {
            data.extend_from_slice(&quantize_i16(channel[frame]).to_le_bytes());
        }
    }
    data
}

/// Convert already-interleaved float samples to 16-bit little-endian PCM bytes.
///
/// Output length = `samples.len() * 2` bytes.
pub fn interleaved_to_pcm16(samples: &[f32]) -> Vec<u8> {
    let mut data = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        data.extend_from_slice(&quantize_i16(sample).to_le_bytes());
    }
    data
}
