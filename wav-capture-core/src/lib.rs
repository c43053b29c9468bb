//! # wav-capture-core
//!
//! Capture accumulation and WAV container codec.
//!
//! Turns a live stream of multichannel float frames into a self-describing
//! 16-bit PCM WAV buffer, and parses, slices, and analyzes such buffers.
//! Device capture, permissions, upload and persistence stay with the host;
//! they exchange plain byte buffers (or base64 text) with this crate.
//!
//! ## Architecture
//!
//! ```text
//! wav-capture-core (this crate)
//! ├── models/       ← WavError, CaptureState, SinkConfiguration, FrameBatch, PcmChunk, RecordingMetadata
//! ├── processing/   ← 44-byte WAV header codec, float → 16-bit PCM quantization
//! ├── session/      ← CaptureSink state machine, SharedCaptureSink
//! ├── storage/      ← Sound, base64 portable text
//! └── traits/       ← CaptureProvider
//! ```
//!
//! ## Example
//!
//! ```
//! use wav_capture_core::{CaptureSink, FrameBatch, Sound};
//!
//! let mut sink = CaptureSink::new();
//! sink.start()?;
//!
//! let left = [0.0f32, 0.5, -0.5, 0.0];
//! let right = [0.0f32, 0.25, -0.25, 0.0];
//! let channels: [&[f32]; 2] = [&left, &right];
//! sink.append_frames(&FrameBatch::new(8000.0, &channels))?;
//!
//! let sound = sink.finalize()?;
//! assert_eq!(sound.sample_count(), 4);
//! assert_eq!(sound.get_sample(1, 0), 0.5);
//!
//! let text = sound.to_portable_text();
//! let copy = Sound::from_portable_text(&text)?;
//! assert_eq!(copy.to_bytes(), sound.to_bytes());
//! # Ok::<(), wav_capture_core::WavError>(())
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::audio_models::{CaptureDiagnostics, FrameBatch, PcmChunk};
pub use models::config::SinkConfiguration;
pub use models::error::WavError;
pub use models::recording_result::RecordingMetadata;
pub use models::state::CaptureState;
pub use processing::wav_format::{WavHeader, WAV_HEADER_SIZE};
pub use session::capture_sink::{CaptureEvent, CaptureSink, StopHandle};
pub use session::shared_sink::SharedCaptureSink;
pub use storage::sound::Sound;
pub use traits::capture_provider::{AudioBufferCallback, CaptureProvider};
