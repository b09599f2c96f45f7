//! Audio output using cpal

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tachyon_shared::{AudioBuffer, AudioFormat};
use tracing::{debug, error, info};

use super::{AudioCallback, AudioError, CancellationToken};
use crate::config::AudioConfig;

/// Samples rendered per callback invocation on non-i16 devices.
const SCRATCH_SAMPLES: usize = 4096;

/// An open output stream driving an [`AudioCallback`].
///
/// Dropping the device stops the stream.
pub struct AudioDevice {
    stream: cpal::Stream,
    format: AudioFormat,
    token: CancellationToken,
    device_name: String,
}

impl AudioDevice {
    /// Format [`start`](Self::start) would open with `config`, without
    /// starting a stream.
    pub fn query_format(config: &AudioConfig) -> Result<AudioFormat, AudioError> {
        let device = default_device()?;
        let supported = choose_config(&device, config)?;
        Ok(format_of(&supported.config()))
    }

    /// Opens the default output device and starts calling `callback`.
    pub fn start<C: AudioCallback>(config: &AudioConfig, callback: C) -> Result<Self, AudioError> {
        let device = default_device()?;
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());

        let supported = choose_config(&device, config)?;
        let stream_config: cpal::StreamConfig = supported.config();
        let format = format_of(&stream_config);

        let token = CancellationToken::new();
        let mut renderer = Renderer::new(callback, format, token.clone());

        let stream = match supported.sample_format() {
            cpal::SampleFormat::I16 => device.build_output_stream(
                &stream_config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| renderer.render_i16(data),
                |err| error!("Audio stream error: {}", err),
                None,
            )?,
            cpal::SampleFormat::F32 => device.build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    renderer.render_converted(data, i16_to_f32, 0.0)
                },
                |err| error!("Audio stream error: {}", err),
                None,
            )?,
            cpal::SampleFormat::U16 => device.build_output_stream(
                &stream_config,
                move |data: &mut [u16], _: &cpal::OutputCallbackInfo| {
                    // 0x8000 is silence for u16 audio
                    renderer.render_converted(data, i16_to_u16, 32768)
                },
                |err| error!("Audio stream error: {}", err),
                None,
            )?,
            other => return Err(AudioError::UnsupportedFormat(format!("{other:?}"))),
        };

        stream.play()?;
        info!(
            "Audio stream started on '{}': {} Hz, {} channels, {:?}",
            device_name,
            format.samples_per_second,
            format.channels,
            supported.sample_format()
        );

        Ok(Self {
            stream,
            format,
            token,
            device_name,
        })
    }

    /// Format of the buffers handed to the callback.
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Stops calling the callback and pauses the stream.
    ///
    /// Callbacks already past the cancellation check finish normally; every
    /// later one outputs silence.
    pub fn shutdown(&mut self) -> Result<(), AudioError> {
        self.token.cancel();
        self.stream.pause()?;
        debug!("Audio stream on '{}' shut down", self.device_name);
        Ok(())
    }
}

fn default_device() -> Result<cpal::Device, AudioError> {
    cpal::default_host()
        .default_output_device()
        .ok_or(AudioError::NoDevice)
}

fn format_of(config: &cpal::StreamConfig) -> AudioFormat {
    AudioFormat::new(config.sample_rate.0, config.channels)
}

/// Picks a stream config matching the requested rate and channels, falling
/// back to the device default for anything not requested.
fn choose_config(
    device: &cpal::Device,
    config: &AudioConfig,
) -> Result<cpal::SupportedStreamConfig, AudioError> {
    let default = device.default_output_config()?;
    if config.sample_rate.is_none() && config.channels.is_none() {
        return Ok(default);
    }

    let sample_rate = config.sample_rate.unwrap_or(default.sample_rate().0);
    let channels = config.channels.unwrap_or(default.channels());
    let rank = |format: cpal::SampleFormat| match format {
        cpal::SampleFormat::I16 => 0,
        cpal::SampleFormat::F32 => 1,
        cpal::SampleFormat::U16 => 2,
        _ => 3,
    };

    device
        .supported_output_configs()?
        .filter(|range| {
            range.channels() == channels
                && range.min_sample_rate().0 <= sample_rate
                && sample_rate <= range.max_sample_rate().0
                && rank(range.sample_format()) < 3
        })
        .min_by_key(|range| rank(range.sample_format()))
        .map(|range| range.with_sample_rate(cpal::SampleRate(sample_rate)))
        .ok_or(AudioError::NoMatchingConfig {
            sample_rate: config.sample_rate,
            channels: config.channels,
        })
}

fn i16_to_f32(sample: i16) -> f32 {
    sample as f32 / 32768.0
}

fn i16_to_u16(sample: i16) -> u16 {
    (sample as i32 + 32768) as u16
}

/// Device-thread side: checks cancellation, then runs the callback either
/// directly on the device buffer or through a preallocated scratch buffer.
struct Renderer<C> {
    callback: C,
    format: AudioFormat,
    token: CancellationToken,
    scratch: Vec<i16>,
}

impl<C: AudioCallback> Renderer<C> {
    fn new(callback: C, format: AudioFormat, token: CancellationToken) -> Self {
        let channels = format.channels.max(1) as usize;
        let len = (SCRATCH_SAMPLES / channels).max(1) * channels;
        Self {
            callback,
            format,
            token,
            scratch: vec![0; len],
        }
    }

    fn render_i16(&mut self, data: &mut [i16]) {
        if self.token.is_cancelled() {
            data.fill(0);
            return;
        }
        let mut buffer = AudioBuffer::new(data, self.format);
        self.callback.render(&mut buffer);
    }

    /// Renders in scratch-sized chunks so the callback never allocates.
    fn render_converted<T: Copy>(&mut self, data: &mut [T], convert: fn(i16) -> T, silence: T) {
        if self.token.is_cancelled() {
            data.fill(silence);
            return;
        }
        let chunk_len = self.scratch.len();
        for out in data.chunks_mut(chunk_len) {
            let scratch = &mut self.scratch[..out.len()];
            scratch.fill(0);
            let mut buffer = AudioBuffer::new(scratch, self.format);
            self.callback.render(&mut buffer);
            for (dst, &src) in out.iter_mut().zip(self.scratch.iter()) {
                *dst = convert(src);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counting {
        calls: usize,
        frames_seen: usize,
    }

    impl AudioCallback for Counting {
        fn render(&mut self, buffer: &mut AudioBuffer<'_>) {
            self.calls += 1;
            self.frames_seen += buffer.frames();
            buffer.samples_mut().fill(1000);
        }
    }

    fn renderer(channels: u16) -> Renderer<Counting> {
        Renderer::new(
            Counting {
                calls: 0,
                frames_seen: 0,
            },
            AudioFormat::new(48_000, channels),
            CancellationToken::new(),
        )
    }

    #[test]
    fn test_i16_renders_in_place() {
        let mut r = renderer(2);
        let mut data = vec![0i16; 512];
        r.render_i16(&mut data);
        assert_eq!(r.callback.calls, 1);
        assert_eq!(r.callback.frames_seen, 256);
        assert!(data.iter().all(|&s| s == 1000));
    }

    #[test]
    fn test_f32_renders_in_chunks() {
        let mut r = renderer(2);
        let mut data = vec![0.0f32; 10_000];
        r.render_converted(&mut data, i16_to_f32, 0.0);
        assert_eq!(r.callback.calls, 3);
        assert_eq!(r.callback.frames_seen, 5_000);
        assert!(data.iter().all(|&s| (s - 1000.0 / 32768.0).abs() < 1e-6));
    }

    #[test]
    fn test_scratch_is_whole_frames() {
        let r = renderer(3);
        assert_eq!(r.scratch.len() % 3, 0);
        assert!(r.scratch.len() <= SCRATCH_SAMPLES);
    }

    #[test]
    fn test_cancelled_outputs_silence() {
        let mut r = renderer(2);
        r.token.cancel();

        let mut data = vec![5i16; 64];
        r.render_i16(&mut data);
        assert!(data.iter().all(|&s| s == 0));

        let mut data = vec![0u16; 64];
        r.render_converted(&mut data, i16_to_u16, 32768);
        assert!(data.iter().all(|&s| s == 32768));

        assert_eq!(r.callback.calls, 0);
    }

    #[test]
    fn test_sample_conversions() {
        assert_eq!(i16_to_u16(0), 32768);
        assert_eq!(i16_to_u16(i16::MIN), 0);
        assert_eq!(i16_to_u16(i16::MAX), 65535);
        assert_eq!(i16_to_f32(i16::MIN), -1.0);
        assert_eq!(i16_to_f32(0), 0.0);
    }
}
