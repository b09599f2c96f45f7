//! RGBA8 images.

use crate::FormatError;

/// Decoded image, always stored as tightly packed RGBA8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl Image {
    /// Bytes per pixel.
    pub const CHANNELS: u32 = 4;

    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, FormatError> {
        let expected = width as usize * height as usize * Self::CHANNELS as usize;
        if pixels.len() != expected {
            return Err(FormatError::PixelSizeMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Single-colour image.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let pixels = rgba.iter().copied().cycle().take(count * 4).collect();
        Self {
            pixels,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u32 {
        Self::CHANNELS
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_size_mismatch() {
        let err = Image::new(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            FormatError::PixelSizeMismatch {
                expected: 16,
                actual: 15,
                ..
            }
        ));
    }

    #[test]
    fn test_solid_image_pixels() {
        let image = Image::solid(3, 2, [1, 2, 3, 4]);
        assert_eq!(image.pixels().len(), 24);
        assert_eq!(image.pixel(2, 1), Some([1, 2, 3, 4]));
        assert_eq!(image.pixel(3, 0), None);
    }
}
