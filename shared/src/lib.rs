//! Shared types for the Tachyon platform layer.
//!
//! Plain data passed between the platform crate, the synth engine and
//! applications: PCM audio in interleaved 16-bit form and RGBA8 images.

pub mod audio;
pub mod image;

pub use audio::{AudioBuffer, AudioCallback, AudioFormat, PcmBuffer};
pub use image::Image;

/// Error returned when raw sample or pixel data does not match its declared shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("audio format must have at least one channel")]
    ZeroChannels,
    #[error("audio format must have a non-zero sample rate")]
    ZeroSampleRate,
    #[error("{len} samples do not divide into frames of {channels} channels")]
    RaggedSamples { len: usize, channels: u16 },
    #[error("expected {expected} bytes for a {width}x{height} RGBA8 image, got {actual}")]
    PixelSizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}
