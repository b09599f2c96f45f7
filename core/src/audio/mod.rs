//! Audio output
//!
//! The application registers one [`AudioCallback`] when it opens the
//! [`AudioDevice`]. The callback runs on the device's real-time thread and
//! renders interleaved i16 frames into an
//! [`AudioBuffer`](tachyon_shared::AudioBuffer); it must not
//! allocate, lock or block.
//!
//! Shutdown is explicit: [`AudioDevice::shutdown`] trips a
//! [`CancellationToken`] that every callback checks first, after which the
//! device outputs silence without calling back into the application.

mod device;

pub use device::AudioDevice;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub use tachyon_shared::AudioCallback;

/// Shared stop flag between the main thread and the audio callback.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Errors opening or controlling the output device.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("no audio output device available")]
    NoDevice,
    #[error("failed to query output configs: {0}")]
    SupportedConfigs(#[from] cpal::SupportedStreamConfigsError),
    #[error("failed to get default output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("device has no output config with {channels:?} channels at {sample_rate:?} Hz")]
    NoMatchingConfig {
        sample_rate: Option<u32>,
        channels: Option<u16>,
    },
    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to play audio stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
    #[error("failed to pause audio stream: {0}")]
    Pause(#[from] cpal::PauseStreamError),
}
