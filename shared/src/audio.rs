//! Interleaved 16-bit PCM audio.
//!
//! [`PcmBuffer`] owns immutable sample data (decoded clips, procedural
//! sounds). [`AudioBuffer`] is a mutable view over the device buffer handed
//! to the audio callback for one render quantum.

use serde::{Deserialize, Serialize};

use crate::FormatError;

/// Sample rate used when the device does not dictate one.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Layout of interleaved PCM data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Frames per second.
    pub samples_per_second: u32,
    /// Interleaved channels per frame.
    pub channels: u16,
    /// Bytes per single-channel sample. Always 2 for i16 data.
    pub bytes_per_sample: u16,
}

impl AudioFormat {
    /// 16-bit format with the given rate and channel count.
    pub const fn new(samples_per_second: u32, channels: u16) -> Self {
        Self {
            samples_per_second,
            channels,
            bytes_per_sample: 2,
        }
    }

    /// 16-bit mono.
    pub const fn mono(samples_per_second: u32) -> Self {
        Self::new(samples_per_second, 1)
    }

    /// 16-bit stereo.
    pub const fn stereo(samples_per_second: u32) -> Self {
        Self::new(samples_per_second, 2)
    }

    /// Rejects formats no buffer could be built from.
    pub fn validate(&self) -> Result<(), FormatError> {
        if self.channels == 0 {
            return Err(FormatError::ZeroChannels);
        }
        if self.samples_per_second == 0 {
            return Err(FormatError::ZeroSampleRate);
        }
        Ok(())
    }

    /// Size of one interleaved frame in bytes.
    pub fn bytes_per_frame(&self) -> usize {
        self.channels as usize * self.bytes_per_sample as usize
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self::stereo(DEFAULT_SAMPLE_RATE)
    }
}

/// Immutable interleaved i16 samples plus their format.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    samples: Vec<i16>,
    format: AudioFormat,
}

impl PcmBuffer {
    /// Wraps interleaved samples. The sample count must be a whole number of frames.
    pub fn new(samples: Vec<i16>, format: AudioFormat) -> Result<Self, FormatError> {
        format.validate()?;
        if samples.len() % format.channels as usize != 0 {
            return Err(FormatError::RaggedSamples {
                len: samples.len(),
                channels: format.channels,
            });
        }
        Ok(Self { samples, format })
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn channels(&self) -> usize {
        self.format.channels as usize
    }

    /// Number of interleaved frames.
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples of frame `index`, one per channel.
    pub fn frame(&self, index: usize) -> Option<&[i16]> {
        let channels = self.channels();
        let start = index.checked_mul(channels)?;
        self.samples.get(start..start + channels)
    }

    /// Playback length in seconds at the buffer's own rate.
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.format.samples_per_second as f64
    }
}

/// Renders audio on the device thread.
pub trait AudioCallback: Send + 'static {
    /// Fills `buffer` for one quantum. The contents on entry are unspecified.
    fn render(&mut self, buffer: &mut AudioBuffer<'_>);
}

impl<F> AudioCallback for F
where
    F: FnMut(&mut AudioBuffer<'_>) + Send + 'static,
{
    fn render(&mut self, buffer: &mut AudioBuffer<'_>) {
        self(buffer)
    }
}

/// Mutable view over the interleaved output buffer of one audio callback.
#[derive(Debug)]
pub struct AudioBuffer<'a> {
    samples: &'a mut [i16],
    format: AudioFormat,
}

impl<'a> AudioBuffer<'a> {
    /// Views `samples` as frames of `format.channels`. A trailing partial
    /// frame is excluded from the view.
    pub fn new(samples: &'a mut [i16], format: AudioFormat) -> Self {
        let channels = format.channels.max(1) as usize;
        let whole = samples.len() - samples.len() % channels;
        Self {
            samples: &mut samples[..whole],
            format,
        }
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn channels(&self) -> usize {
        self.format.channels.max(1) as usize
    }

    pub fn sample_rate(&self) -> u32 {
        self.format.samples_per_second
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels()
    }

    pub fn samples(&self) -> &[i16] {
        &*self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [i16] {
        &mut *self.samples
    }

    /// Iterates frames mutably, one slice of `channels` samples each.
    pub fn frames_mut(&mut self) -> std::slice::ChunksExactMut<'_, i16> {
        let channels = self.channels();
        self.samples.chunks_exact_mut(channels)
    }

    /// Writes silence over the whole buffer.
    pub fn clear(&mut self) {
        self.samples.fill(0);
    }
}
