//! PCM mixing into the live output buffer.

use tachyon_shared::{AudioBuffer, PcmBuffer};

/// Converts a gain in decibels to a linear amplitude.
pub fn db_to_amp(volume_db: f32) -> f32 {
    10f64.powf(volume_db as f64 / 20.0) as f32
}

/// Adds `value` to a 16-bit sample, clamping at the i16 range instead of
/// wrapping.
#[inline]
pub fn saturating_add_sample(sample: &mut i16, value: f32) {
    *sample = (*sample as f32 + value).clamp(i16::MIN as f32, i16::MAX as f32) as i16;
}

/// Mixes `source` into `dest`, scaled by `amp`.
///
/// Reading starts at source frame `start_frame`; writing always starts at
/// the first frame of `dest`. Mixing stops when either buffer runs out.
/// A mono source is spread over every destination channel. Otherwise the
/// leading `min(source, dest)` channels are mixed and any extra channels
/// are left untouched.
///
/// Returns the source frame reached, to be passed back in as `start_frame`
/// on the next quantum.
pub fn mix(source: &PcmBuffer, dest: &mut AudioBuffer<'_>, amp: f32, start_frame: usize) -> usize {
    let source_channels = source.channels();
    let source_frames = source
        .samples()
        .chunks_exact(source_channels)
        .skip(start_frame);

    let mut reached = start_frame.min(source.frames());
    if source_channels == 1 {
        for (dest_frame, source_frame) in dest.frames_mut().zip(source_frames) {
            let x = amp * source_frame[0] as f32;
            for sample in dest_frame {
                saturating_add_sample(sample, x);
            }
            reached += 1;
        }
    } else {
        for (dest_frame, source_frame) in dest.frames_mut().zip(source_frames) {
            for (sample, &s) in dest_frame.iter_mut().zip(source_frame) {
                saturating_add_sample(sample, amp * s as f32);
            }
            reached += 1;
        }
    }
    reached
}
