//! Tachyon Synth - real-time note synthesis
//!
//! A small polyphonic synthesizer driven from the UI thread and rendered on
//! the audio device thread.
//!
//! # Architecture
//!
//! - [`queue`] - SPSC ring carrying note triggers across threads
//! - [`voice`] - Fixed-capacity pool of playing notes
//! - [`mixing`] - Additive PCM mixing with channel up/down-mixing
//! - [`engine`] - [`SynthHandle`] / [`SynthEngine`] pair tying it together

pub mod bank;
pub mod engine;
pub mod metrics;
pub mod mixing;
pub mod queue;
pub mod voice;

pub use bank::{ClipId, SampleBank};
pub use engine::{SynthConfig, SynthEngine, SynthHandle, synth};
pub use metrics::SynthStats;
pub use queue::NoteInitParameters;

/// Errors raised while building a synth.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthError {
    #[error("note queue capacity must be a non-zero power of two, got {0}")]
    InvalidQueueCapacity(usize),
    #[error("synth needs at least one voice")]
    ZeroVoices,
}
