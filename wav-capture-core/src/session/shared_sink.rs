use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::audio_models::CaptureDiagnostics;
use crate::models::error::WavError;
use crate::models::state::CaptureState;
use crate::session::capture_sink::{CaptureSink, StopHandle};
use crate::storage::sound::Sound;
use crate::traits::capture_provider::{AudioBufferCallback, CaptureProvider};

/// A [`CaptureSink`] shared between a backend's audio thread and a control thread.
///
/// ```text
/// [CaptureProvider thread] → callback → lock → append_interleaved
/// [control thread]         → finish   → stop sink → stop provider → finalize
/// ```
///
/// The lock is held only while one batch is quantized.
#[derive(Clone)]
pub struct SharedCaptureSink {
    inner: Arc<Mutex<CaptureSink>>,
    stop: StopHandle,
}

impl SharedCaptureSink {
    pub fn new(sink: CaptureSink) -> Self {
        let stop = sink.stop_handle();
        Self {
            inner: Arc::new(Mutex::new(sink)),
            stop,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.inner.lock().state()
    }

    pub fn diagnostics(&self) -> CaptureDiagnostics {
        self.inner.lock().diagnostics()
    }

    /// Request a stop without waiting for the lock.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Callback that appends each delivered buffer to the sink.
    ///
    /// Rejected buffers are logged; the audio thread never sees an error.
    pub fn buffer_callback(&self) -> AudioBufferCallback {
        let inner = Arc::clone(&self.inner);
        Arc::new(move |samples: &[f32], sample_rate: f64, channels: u16| {
            if let Err(e) = inner.lock().append_interleaved(samples, sample_rate, channels) {
                log::error!("Failed to buffer audio data: {}", e);
            }
        })
    }

    /// Start the sink and connect `provider` to it.
    pub fn start<P: CaptureProvider>(&self, provider: &mut P) -> Result<(), WavError> {
        if !provider.is_available() {
            return Err(WavError::Provider(format!("{} is not available", provider.name())));
        }
        self.inner.lock().start()?;
        if let Err(e) = provider.start(self.buffer_callback()) {
            // Leave the sink stopped so a failed start cannot collect stray buffers.
            if let Err(stop_err) = self.inner.lock().stop() {
                log::warn!("failed to stop sink after {} refused to start: {}", provider.name(), stop_err);
            }
            return Err(e);
        }
        log::debug!("capture started on {}", provider.name());
        Ok(())
    }

    /// Stop the sink, stop `provider`, and finalize the recording.
    ///
    /// The sink stops first so buffers racing with the provider shutdown are
    /// discarded instead of appended.
    pub fn finish<P: CaptureProvider>(&self, provider: &mut P) -> Result<Sound, WavError> {
        self.inner.lock().stop()?;
        if let Err(e) = provider.stop() {
            log::warn!("{} failed to stop cleanly: {}", provider.name(), e);
        }
        self.inner.lock().finalize()
    }
}
