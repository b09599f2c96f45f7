//! Audio and image loading.
//!
//! WAV files of any integer bit depth or 32-bit float are converted to
//! interleaved i16. Images are decoded with `image` and converted to RGBA8.

use std::path::{Path, PathBuf};

use tachyon_shared::{AudioFormat, FormatError, Image, PcmBuffer};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read WAV {path}: {source}")]
    Wav {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
    #[error("{path}: unsupported {bits}-bit integer WAV")]
    UnsupportedBitDepth { path: PathBuf, bits: u16 },
    #[error("failed to load image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Loads a WAV file as interleaved 16-bit PCM.
pub fn load_audio(path: impl AsRef<Path>) -> Result<PcmBuffer, AssetError> {
    let path = path.as_ref();
    let wav_error = |source| AssetError::Wav {
        path: path.to_path_buf(),
        source,
    };

    let reader = hound::WavReader::open(path).map_err(wav_error)?;
    let spec = reader.spec();

    let samples: Vec<i16> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let bits = spec.bits_per_sample;
            if bits == 0 || bits > 32 {
                return Err(AssetError::UnsupportedBitDepth {
                    path: path.to_path_buf(),
                    bits,
                });
            }
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|s| int_to_i16(s, bits)))
                .collect::<Result<_, _>>()
                .map_err(wav_error)?
        }
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(float_to_i16))
            .collect::<Result<_, _>>()
            .map_err(wav_error)?,
    };

    let format = AudioFormat::new(spec.sample_rate, spec.channels);
    let buffer = PcmBuffer::new(samples, format)?;
    debug!(
        "Loaded {}: {} frames, {} Hz, {} channels",
        path.display(),
        buffer.frames(),
        spec.sample_rate,
        spec.channels
    );
    Ok(buffer)
}

/// Loads an image file as RGBA8.
pub fn load_image(path: impl AsRef<Path>) -> Result<Image, AssetError> {
    let path = path.as_ref();
    let decoded = image::open(path).map_err(|source| AssetError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    debug!("Loaded {}: {}x{}", path.display(), width, height);
    Ok(Image::new(width, height, rgba.into_raw())?)
}

fn int_to_i16(sample: i32, bits: u16) -> i16 {
    if bits >= 16 {
        (sample >> (bits - 16)) as i16
    } else {
        (sample << (16 - bits)) as i16
    }
}

fn float_to_i16(sample: f32) -> i16 {
    (sample * 32767.0).clamp(i16::MIN as f32, i16::MAX as f32) as i16
}
