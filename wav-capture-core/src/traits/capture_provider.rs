use std::sync::Arc;

use crate::models::error::WavError;

/// Callback invoked when a capture backend has a buffer ready.
///
/// Parameters:
/// - `samples`: Interleaved f32 samples.
/// - `sample_rate`: The actual sample rate of the delivered audio.
/// - `channels`: Number of interleaved channels.
pub type AudioBufferCallback = Arc<dyn Fn(&[f32], f64, u16) + Send + Sync + 'static>;

/// Interface for platform audio sources that feed a capture sink.
///
/// Device enumeration and permission prompts live in the implementor; this
/// crate only consumes the delivered buffers.
pub trait CaptureProvider: Send + Sync {
    /// Whether this capture source is currently available.
    fn is_available(&self) -> bool;

    /// Start capturing audio, delivering buffers via `callback`.
    ///
    /// The callback fires on the backend's audio thread. Deliveries must not
    /// overlap.
    fn start(&mut self, callback: AudioBufferCallback) -> Result<(), WavError>;

    /// Stop capturing. No callback may fire after this returns.
    fn stop(&mut self) -> Result<(), WavError>;

    /// Human-readable name of the backing device.
    fn name(&self) -> &str;
}
