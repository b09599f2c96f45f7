//! Built-in chime used when no sound file is given.

use std::f64::consts::TAU;

use tachyon_shared::audio::DEFAULT_SAMPLE_RATE;
use tachyon_shared::{AudioFormat, FormatError, PcmBuffer};

/// Fundamental and relative level of each partial.
const PARTIALS: [(f64, f64); 3] = [(880.0, 0.6), (1760.0, 0.25), (2640.0, 0.15)];
const DURATION_SECS: f64 = 1.5;
/// Decay rate of the first partial per second; higher partials decay faster.
const DECAY_PER_SEC: f64 = 4.0;
const PEAK: f64 = 0.8 * 32767.0;

/// Renders a short bell-like mono clip at `sample_rate`.
pub fn procedural_chime(sample_rate: u32) -> Result<PcmBuffer, FormatError> {
    let format = AudioFormat::mono(sample_rate);
    format.validate()?;

    let frames = (DURATION_SECS * sample_rate as f64) as usize;
    let samples = (0..frames)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            let value: f64 = PARTIALS
                .iter()
                .enumerate()
                .map(|(n, &(hz, level))| {
                    let decay = (-DECAY_PER_SEC * (n + 1) as f64 * t).exp();
                    level * decay * (TAU * hz * t).sin()
                })
                .sum();
            (PEAK * value).round() as i16
        })
        .collect();

    PcmBuffer::new(samples, format)
}

/// Chime at the device rate, or [`DEFAULT_SAMPLE_RATE`] without a device.
pub fn chime_for(device: Option<AudioFormat>) -> Result<PcmBuffer, FormatError> {
    procedural_chime(device.map_or(DEFAULT_SAMPLE_RATE, |format| format.samples_per_second))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chime_shape() {
        let chime = procedural_chime(48_000).unwrap();
        assert_eq!(chime.channels(), 1);
        assert_eq!(chime.frames(), 72_000);
        assert_eq!(chime.samples()[0], 0);
    }

    #[test]
    fn test_chime_decays() {
        let chime = procedural_chime(44_100).unwrap();
        let peak = |range: std::ops::Range<usize>| {
            chime.samples()[range]
                .iter()
                .map(|s| s.unsigned_abs())
                .max()
                .unwrap_or(0)
        };
        let head = peak(0..4_410);
        let tail = peak(chime.frames() - 4_410..chime.frames());
        assert!(head > 10_000, "head peak {head}");
        assert!(tail < head / 50, "tail peak {tail}");
    }

    #[test]
    fn test_chime_follows_device_rate() {
        let chime = chime_for(Some(AudioFormat::stereo(48_000))).unwrap();
        assert_eq!(chime.format(), AudioFormat::mono(48_000));
        assert_eq!(chime.frames(), 72_000);

        let fallback = chime_for(None).unwrap();
        assert_eq!(fallback.format().samples_per_second, DEFAULT_SAMPLE_RATE);
    }

    #[test]
    fn test_chime_rejects_zero_rate() {
        assert_eq!(procedural_chime(0).unwrap_err(), FormatError::ZeroSampleRate);
    }
}
