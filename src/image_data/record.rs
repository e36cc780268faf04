//! Storage shared by the gray and color layouts
//!
//! A record owns two unpacked sample buffers and one packed buffer:
//! - `original`: the authoritative data, only replaced by `make_permanent`
//! - `display`: a working copy that editors and filters may change freely
//! - `packed`: one `0x00RRGGBB` value per pixel derived from `display`

use std::path::{Path, PathBuf};

use crate::error::{ImageError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    width: usize,
    height: usize,
    min: i32,
    max: i32,
    modified: bool,
    is_audio: bool,
    sample_rate: u32,
    source_path: Option<PathBuf>,
    original: Vec<i32>,
    display: Vec<i32>,
    packed: Vec<u32>,
}

impl ImageRecord {
    /// Validate `samples` against the image shape and build the buffers.
    ///
    /// `pack` turns the display samples into the packed buffer; it is supplied
    /// by the owning layout.
    pub(crate) fn new<F>(
        samples: Vec<i32>,
        width: usize,
        height: usize,
        channels: usize,
        pack: F,
    ) -> Result<Self>
    where
        F: FnOnce(&[i32]) -> Result<Vec<u32>>,
    {
        let expected = width.saturating_mul(height).saturating_mul(channels);
        if samples.len() != expected {
            return Err(ImageError::ShapeMismatch {
                width,
                height,
                channels,
                expected,
                actual: samples.len(),
            });
        }

        let (min, max) = sample_bounds(&samples).ok_or(ImageError::EmptyImage)?;
        let display = samples.clone();
        let packed = pack(&display)?;

        log::debug!("{}x{}x{}: min={}, max={}", width, height, channels, min, max);

        Ok(Self {
            width,
            height,
            min,
            max,
            modified: false,
            is_audio: false,
            sample_rate: 0,
            source_path: None,
            original: samples,
            display,
            packed,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels (`width * height`)
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Smallest value in the original samples
    pub fn min(&self) -> i32 {
        self.min
    }

    /// Largest value in the original samples
    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    pub fn is_audio(&self) -> bool {
        self.is_audio
    }

    /// Samples per second; only meaningful when [`is_audio`](Self::is_audio)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn set_audio(&mut self, is_audio: bool, sample_rate: u32) {
        self.is_audio = is_audio;
        self.sample_rate = sample_rate;
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn set_source_path(&mut self, path: impl Into<PathBuf>) {
        self.source_path = Some(path.into());
    }

    pub fn original_samples(&self) -> &[i32] {
        &self.original
    }

    pub fn display_samples(&self) -> &[i32] {
        &self.display
    }

    /// Mutable access for editors. The length is fixed; call the owning
    /// layout's `repack` afterwards to refresh the packed buffer.
    pub fn display_samples_mut(&mut self) -> &mut [i32] {
        &mut self.display
    }

    /// Packed `0x00RRGGBB` buffer, one value per pixel
    pub fn display_buffer(&self) -> &[u32] {
        &self.packed
    }

    pub(crate) fn set_display_buffer(&mut self, packed: Vec<u32>) {
        debug_assert_eq!(packed.len(), self.pixel_count());
        self.packed = packed;
    }

    /// Recompute `min`/`max` from the original samples
    pub fn recompute_bounds(&mut self) {
        if let Some((min, max)) = sample_bounds(&self.original) {
            self.min = min;
            self.max = max;
        }
    }

    /// Commit the display samples into the original samples.
    ///
    /// The packed buffer is left untouched: it already reflects the display
    /// samples, which is exactly what the original data now holds.
    pub fn make_permanent(&mut self) {
        self.original.copy_from_slice(&self.display);
        self.recompute_bounds();
    }

    /// Linear index of `(row, col)` in pixel units
    pub(crate) fn pixel_index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.height || col >= self.width {
            return Err(ImageError::OutOfBounds {
                row,
                col,
                width: self.width,
                height: self.height,
            });
        }
        Ok(row * self.width + col)
    }

    /// Carry the non-pixel fields of `other` over to a freshly built record
    pub(crate) fn inherit_media(&mut self, other: &ImageRecord) {
        self.is_audio = other.is_audio;
        self.sample_rate = other.sample_rate;
    }
}

/// `(min, max)` of a sample slice, `None` when empty
pub fn sample_bounds(samples: &[i32]) -> Option<(i32, i32)> {
    let (&first, rest) = samples.split_first()?;
    Some(
        rest.iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}
