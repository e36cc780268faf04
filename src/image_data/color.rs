//! Three-channel image data (interleaved r, g, b per pixel)

use std::ops::{Deref, DerefMut};

use super::record::ImageRecord;
use crate::error::Result;
use crate::pixel::{pack_color_to_rgb, pack_triples};

/// Color image data
///
/// Samples are stored as consecutive `(r, g, b)` triples, so pixel `i` starts
/// at offset `3 * i` in both the original and the display buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorImage {
    record: ImageRecord,
}

impl ColorImage {
    /// Build from `width * height * 3` interleaved samples
    ///
    /// # Errors
    /// * `ShapeMismatch` if `samples.len() != width * height * 3`
    /// * `EmptyImage` if the image has no pixels
    pub fn new(samples: Vec<i32>, width: usize, height: usize) -> Result<Self> {
        let record = ImageRecord::new(samples, width, height, 3, pack_color_to_rgb)?;
        Ok(Self { record })
    }

    fn offset(&self, row: usize, col: usize) -> Result<usize> {
        Ok(3 * self.record.pixel_index(row, col)?)
    }

    pub fn red(&self, row: usize, col: usize) -> Result<i32> {
        let offset = self.offset(row, col)?;
        Ok(self.record.original_samples()[offset])
    }

    pub fn green(&self, row: usize, col: usize) -> Result<i32> {
        let offset = self.offset(row, col)?;
        Ok(self.record.original_samples()[offset + 1])
    }

    pub fn blue(&self, row: usize, col: usize) -> Result<i32> {
        let offset = self.offset(row, col)?;
        Ok(self.record.original_samples()[offset + 2])
    }

    /// All three components of the original data at `(row, col)`
    pub fn rgb(&self, row: usize, col: usize) -> Result<[i32; 3]> {
        let offset = self.offset(row, col)?;
        let samples = self.record.original_samples();
        Ok([samples[offset], samples[offset + 1], samples[offset + 2]])
    }

    /// Re-derive the packed display buffer from the display samples
    pub fn repack(&mut self) {
        // Display length is fixed at 3 * pixels
        let packed = pack_triples(self.record.display_samples());
        self.record.set_display_buffer(packed);
    }
}

impl Deref for ColorImage {
    type Target = ImageRecord;

    fn deref(&self) -> &ImageRecord {
        &self.record
    }
}

impl DerefMut for ColorImage {
    fn deref_mut(&mut self) -> &mut ImageRecord {
        &mut self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImageError;

    #[test]
    fn test_scenario_1x2_clamped_pack() {
        let image = ColorImage::new(vec![10, 20, 30, -5, 300, 128], 2, 1).unwrap();
        assert_eq!(image.display_buffer()[0], (10 << 16) | (20 << 8) | 30);
        assert_eq!(image.display_buffer()[1], (255 << 8) | 128);
        assert_eq!((image.min(), image.max()), (-5, 300));
    }

    #[test]
    fn test_channel_accessors_match_offsets() {
        let (width, height) = (4, 3);
        let samples: Vec<i32> = (0..(width * height * 3) as i32).map(|i| i * 3 - 11).collect();
        let image = ColorImage::new(samples.clone(), width, height).unwrap();

        for r in 0..height {
            for c in 0..width {
                let offset = 3 * (r * width + c);
                assert_eq!(image.red(r, c).unwrap(), samples[offset]);
                assert_eq!(image.green(r, c).unwrap(), samples[offset + 1]);
                assert_eq!(image.blue(r, c).unwrap(), samples[offset + 2]);
                assert_eq!(
                    image.rgb(r, c).unwrap(),
                    [samples[offset], samples[offset + 1], samples[offset + 2]]
                );
            }
        }
    }

    #[test]
    fn test_accessor_out_of_bounds() {
        let image = ColorImage::new(vec![0; 12], 2, 2).unwrap();
        assert!(image.blue(1, 1).is_ok());
        assert!(matches!(image.red(2, 0), Err(ImageError::OutOfBounds { .. })));
        assert!(matches!(image.green(0, 2), Err(ImageError::OutOfBounds { .. })));
    }

    #[test]
    fn test_shape_mismatch() {
        // 2x2 color needs 12 samples; 4 would be a gray shape
        assert!(matches!(
            ColorImage::new(vec![0; 4], 2, 2),
            Err(ImageError::ShapeMismatch { channels: 3, expected: 12, actual: 4, .. })
        ));
    }

    #[test]
    fn test_empty_color_rejected() {
        assert!(matches!(ColorImage::new(vec![], 3, 0), Err(ImageError::EmptyImage)));
    }

    #[test]
    fn test_repack_after_edit() {
        let mut image = ColorImage::new(vec![1, 2, 3], 1, 1).unwrap();
        image.display_samples_mut().copy_from_slice(&[255, -1, 64]);
        image.repack();
        assert_eq!(image.display_buffer(), &[(255 << 16) | 64]);
        assert_eq!(image.rgb(0, 0).unwrap(), [1, 2, 3]);
    }

    #[test]
    fn test_repack_covers_every_pixel() {
        let mut image = ColorImage::new(vec![0; 12], 2, 2).unwrap();
        for (i, v) in image.display_samples_mut().iter_mut().enumerate() {
            *v = i as i32 * 30;
        }
        image.repack();
        assert_eq!(image.display_buffer().len(), 4);
        assert_eq!(image.display_buffer()[3], 0x00ff_ffff);
        assert_eq!(image.display_buffer()[0], (30 << 8) | 60);
    }
}
