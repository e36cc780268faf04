//! Single-channel image data (one sample per pixel)

use std::ops::{Deref, DerefMut};

use super::record::ImageRecord;
use crate::error::Result;
use crate::pixel::pack_gray_to_rgb;

/// Gray image data
///
/// Samples are not clamped: 16-bit data keeps its full range in the original
/// and display buffers, and is only clamped when packed for display.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayImage {
    record: ImageRecord,
}

impl GrayImage {
    /// Build from `width * height` gray samples
    ///
    /// # Errors
    /// * `ShapeMismatch` if `samples.len() != width * height`
    /// * `EmptyImage` if the image has no pixels
    pub fn new(samples: Vec<i32>, width: usize, height: usize) -> Result<Self> {
        let record = ImageRecord::new(samples, width, height, 1, |display| {
            Ok(pack_gray_to_rgb(display))
        })?;
        Ok(Self { record })
    }

    /// Gray value of the original data at `(row, col)`
    pub fn gray(&self, row: usize, col: usize) -> Result<i32> {
        let offset = self.record.pixel_index(row, col)?;
        Ok(self.record.original_samples()[offset])
    }

    /// Re-derive the packed display buffer from the display samples
    pub fn repack(&mut self) {
        let packed = pack_gray_to_rgb(self.record.display_samples());
        self.record.set_display_buffer(packed);
    }
}

impl Deref for GrayImage {
    type Target = ImageRecord;

    fn deref(&self) -> &ImageRecord {
        &self.record
    }
}

impl DerefMut for GrayImage {
    fn deref_mut(&mut self) -> &mut ImageRecord {
        &mut self.record
    }
}
