use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::models::audio_models::{CaptureDiagnostics, FrameBatch, PcmChunk};
use crate::models::config::SinkConfiguration;
use crate::models::error::WavError;
use crate::models::state::CaptureState;
use crate::processing::pcm_convert;
use crate::processing::wav_format::{self, WAV_HEADER_SIZE};
use crate::storage::sound::Sound;

/// Bits per sample of every recording the sink produces.
pub const CAPTURE_BITS_PER_SAMPLE: u16 = 16;

/// Sample rate written into the header of a recording that never received a batch.
pub const EMPTY_RECORDING_SAMPLE_RATE: u32 = 44100;

/// Largest payload a 44-byte RIFF header can describe.
const MAX_DATA_SIZE: u64 = u32::MAX as u64 - 36;

/// Cloneable stop request shared with a control thread.
///
/// Setting it does not touch the sink; the next `append_frames` that sees
/// the flag moves the sink to `Stopped` and drops its batch.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    requested: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn request_stop(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Discrete inputs that drive a [`CaptureSink`].
#[derive(Debug, Clone, Copy)]
pub enum CaptureEvent<'a> {
    FrameBatchReceived(FrameBatch<'a>),
    StopRequested,
    StreamEnded,
}

/// Stream format fixed by the first accepted batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StreamFormat {
    sample_rate: u32,
    channels: u16,
}

/// Accumulates frame batches as 16-bit PCM chunks and finalizes them into a [`Sound`].
///
/// State transitions:
/// ```text
/// idle ──start──→ capturing ──stop──→ stopped
///                     │                  │
///                     └───finalize───────┴──→ finalized
/// ```
///
/// ## Real-time contract
///
/// `append_frames` runs inside the delivery callback of a live audio
/// pipeline. It performs one allocation sized to the batch, never blocks,
/// never does I/O, and returns before the next batch is due. The sink has no
/// internal locking: deliveries for one session must come from a single
/// logical actor, on whatever thread the host uses.
#[derive(Debug)]
pub struct CaptureSink {
    config: SinkConfiguration,
    state: CaptureState,
    stop: StopHandle,
    format: Option<StreamFormat>,
    sample_count: u64,
    data_size: u64,
    chunks: Vec<PcmChunk>,
    diagnostics: CaptureDiagnostics,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::from_valid_configuration(SinkConfiguration::default())
    }

    pub fn with_configuration(config: SinkConfiguration) -> Result<Self, WavError> {
        config.validate().map_err(WavError::Configuration)?;
        Ok(Self::from_valid_configuration(config))
    }

    fn from_valid_configuration(config: SinkConfiguration) -> Self {
        let chunks = Vec::with_capacity(config.chunk_capacity);
        Self {
            config,
            state: CaptureState::Idle,
            stop: StopHandle::default(),
            format: None,
            sample_count: 0,
            data_size: 0,
            chunks,
            diagnostics: CaptureDiagnostics::default(),
        }
    }

    /// Current state, counting a pending stop request as `Stopped`.
    pub fn state(&self) -> CaptureState {
        if self.state.is_capturing() && self.stop.is_stop_requested() {
            CaptureState::Stopped
        } else {
            self.state
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Sample rate taken from the first batch, if one has arrived.
    pub fn sample_rate(&self) -> Option<u32> {
        self.format.map(|f| f.sample_rate)
    }

    /// Channel count taken from the first batch, if one has arrived.
    pub fn channels(&self) -> Option<u16> {
        self.format.map(|f| f.channels)
    }

    /// Frames accumulated so far.
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    pub fn duration_secs(&self) -> f64 {
        match self.format {
            Some(format) => self.sample_count as f64 / format.sample_rate as f64,
            None => 0.0,
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn diagnostics(&self) -> CaptureDiagnostics {
        self.diagnostics
    }

    /// Begin accepting batches. Transitions: idle → capturing.
    pub fn start(&mut self) -> Result<(), WavError> {
        if !self.state.is_idle() {
            return Err(self.reject_transition("start"));
        }
        self.state = CaptureState::Capturing;
        Ok(())
    }

    /// Stop accepting batches. Transitions: capturing → stopped.
    ///
    /// Later batches are discarded without error. Stopping again is a no-op;
    /// stopping before `start` fails.
    pub fn stop(&mut self) -> Result<(), WavError> {
        if self.state.is_idle() {
            return Err(self.reject_transition("stop"));
        }
        self.stop.request_stop();
        if self.state.is_stopped() || self.state.is_terminal() {
            return Ok(());
        }
        self.state = CaptureState::Stopped;
        log::debug!("capture sink stopped after {} frames", self.sample_count());
        Ok(())
    }

    /// Quantize one planar batch into a new chunk.
    ///
    /// The first batch fixes the stream's sample rate (rounded to whole Hz)
    /// and channel count; later batches must match. Samples are converted
    /// with `round(sample * 32768)` and not clamped, so values outside
    /// `[-1, 1]` wrap. After a stop the batch is dropped and `Ok` returned.
    pub fn append_frames(&mut self, batch: &FrameBatch<'_>) -> Result<(), WavError> {
        if !self.accepting("append frames")? {
            return Ok(());
        }
        if let Err(e) = batch.validate() {
            return Err(self.reject_batch(e));
        }
        self.accept(batch.sample_rate, batch.channel_count(), batch.frame_count(), || {
            pcm_convert::planar_to_pcm16(batch.channels)
        })
    }

    /// Quantize one batch delivered as interleaved samples.
    ///
    /// Same rules as [`append_frames`](Self::append_frames).
    pub fn append_interleaved(
        &mut self,
        samples: &[f32],
        sample_rate: f64,
        channels: u16,
    ) -> Result<(), WavError> {
        if !self.accepting("append frames")? {
            return Ok(());
        }
        if channels == 0 {
            let e = WavError::MalformedBatch("interleaved batch declares 0 channels".into());
            return Err(self.reject_batch(e));
        }
        if samples.len() % channels as usize != 0 {
            let e = WavError::MalformedBatch(format!(
                "{} interleaved samples do not divide into {} channels",
                samples.len(),
                channels
            ));
            return Err(self.reject_batch(e));
        }
        let frames = samples.len() / channels as usize;
        self.accept(sample_rate, channels as usize, frames, || {
            pcm_convert::interleaved_to_pcm16(samples)
        })
    }

    /// Assemble the header and every chunk into a [`Sound`].
    ///
    /// Transitions: capturing/stopped → finalized. A sink that never received
    /// a batch yields a zero-sample sound with a valid header. Fails with
    /// `InvalidState` when called twice or before `start`.
    pub fn finalize(&mut self) -> Result<Sound, WavError> {
        if !self.state.can_finalize() {
            return Err(self.reject_transition("finalize"));
        }

        let format = self.format.unwrap_or(StreamFormat {
            sample_rate: self
                .config
                .expected_sample_rate
                .unwrap_or(EMPTY_RECORDING_SAMPLE_RATE),
            channels: self.config.expected_channels.unwrap_or(1),
        });

        let mut bytes = Vec::with_capacity(WAV_HEADER_SIZE + self.data_size as usize);
        bytes.resize(WAV_HEADER_SIZE, 0);
        wav_format::write_defaults(&mut bytes);
        wav_format::write_fields(
            &mut bytes,
            self.sample_count as u32,
            format.sample_rate,
            CAPTURE_BITS_PER_SAMPLE,
            format.channels,
        );
        for chunk in std::mem::take(&mut self.chunks) {
            bytes.extend_from_slice(chunk.bytes());
        }

        self.state = CaptureState::Finalized;
        self.stop.request_stop();

        log::debug!(
            "finalized capture: {} frames, {} Hz x {} ch, {} bytes",
            self.sample_count,
            format.sample_rate,
            format.channels,
            bytes.len()
        );
        Ok(Sound::from_bytes(bytes))
    }

    /// Apply one event. `StreamEnded` returns the finalized sound.
    pub fn handle_event(&mut self, event: CaptureEvent<'_>) -> Result<Option<Sound>, WavError> {
        match event {
            CaptureEvent::FrameBatchReceived(batch) => {
                self.append_frames(&batch)?;
                Ok(None)
            }
            CaptureEvent::StopRequested => {
                self.stop()?;
                Ok(None)
            }
            CaptureEvent::StreamEnded => self.finalize().map(Some),
        }
    }

    // --- Internal helpers ---

    /// Whether a batch should be buffered; `Ok(false)` means discard after stop.
    fn accepting(&mut self, operation: &'static str) -> Result<bool, WavError> {
        if self.state.is_capturing() && self.stop.is_stop_requested() {
            self.state = CaptureState::Stopped;
        }
        match self.state {
            CaptureState::Capturing => Ok(true),
            CaptureState::Stopped => {
                self.diagnostics.batches_discarded += 1;
                log::trace!("discarding frame batch delivered after stop");
                Ok(false)
            }
            CaptureState::Idle | CaptureState::Finalized => Err(self.reject_transition(operation)),
        }
    }

    fn accept<F>(&mut self, sample_rate: f64, channels: usize, frames: usize, encode: F) -> Result<(), WavError>
    where
        F: FnOnce() -> Vec<u8>,
    {
        let format = match self.check_format(sample_rate, channels) {
            Ok(format) => format,
            Err(e) => return Err(self.reject_batch(e)),
        };

        let chunk_size = frames as u64 * format.channels as u64 * 2;
        if self.data_size + chunk_size > MAX_DATA_SIZE {
            let e = WavError::TooLarge(self.data_size + chunk_size);
            return Err(self.reject_batch(e));
        }

        if self.format.is_none() {
            log::debug!(
                "capture format fixed by first batch: {} Hz x {} ch",
                format.sample_rate,
                format.channels
            );
            self.format = Some(format);
        }

        let chunk = PcmChunk::new(encode(), frames);
        self.sample_count += frames as u64;
        self.data_size += chunk.len() as u64;
        self.diagnostics.batches_received += 1;
        self.diagnostics.bytes_buffered += chunk.len() as u64;
        self.chunks.push(chunk);
        Ok(())
    }

    /// Resolve the batch format against the stream format and configuration.
    fn check_format(&self, sample_rate: f64, channels: usize) -> Result<StreamFormat, WavError> {
        if !sample_rate.is_finite() || sample_rate.round() < 1.0 || sample_rate.round() > u32::MAX as f64 {
            return Err(WavError::MalformedBatch(format!(
                "invalid sample rate: {}",
                sample_rate
            )));
        }
        if channels == 0 {
            return Err(WavError::MalformedBatch("batch has no channels".into()));
        }
        if channels > self.config.max_channels as usize {
            return Err(WavError::MalformedBatch(format!(
                "batch has {} channels, at most {} allowed",
                channels, self.config.max_channels
            )));
        }

        let batch = StreamFormat {
            sample_rate: sample_rate.round() as u32,
            channels: channels as u16,
        };
        let expected = self.format.or_else(|| {
            match (self.config.expected_sample_rate, self.config.expected_channels) {
                (None, None) => None,
                (rate, chans) => Some(StreamFormat {
                    sample_rate: rate.unwrap_or(batch.sample_rate),
                    channels: chans.unwrap_or(batch.channels),
                }),
            }
        });

        match expected {
            Some(expected) if expected != batch => Err(WavError::FormatMismatch {
                expected_rate: expected.sample_rate,
                expected_channels: expected.channels,
                rate: batch.sample_rate,
                channels: batch.channels,
            }),
            _ => Ok(batch),
        }
    }

    fn reject_batch(&mut self, error: WavError) -> WavError {
        self.diagnostics.batches_rejected += 1;
        log::warn!("rejected frame batch: {}", error);
        error
    }

    fn reject_transition(&self, operation: &'static str) -> WavError {
        let error = WavError::invalid_state(operation, self.state());
        log::warn!("{}", error);
        error
    }
}

impl Default for CaptureSink {
    fn default() -> Self {
        Self::new()
    }
}
