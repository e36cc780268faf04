//! General bitmap decoding (PNG, JPEG, GIF, BMP, TIFF, ...) via the `image` crate

use std::path::Path;

use image::{ColorType, DynamicImage, ImageReader};
use log::{debug, warn};

use crate::error::{ImageError, Result};
use crate::image_data::ImageKind;

/// Samples extracted from a decoded bitmap
#[derive(Debug, Clone, PartialEq)]
pub struct BitmapRaster {
    pub width: usize,
    pub height: usize,
    /// Native pixel layout reported by the decoder
    pub layout: ColorType,
    /// Layout the samples were normalized to
    pub kind: ImageKind,
    /// `width * height * kind.channels()` samples
    pub samples: Vec<i32>,
}

/// Decode the file at `path`, sniffing the format from its content
pub fn read_bitmap(path: &Path) -> Result<BitmapRaster> {
    let decoded = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|source| ImageError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(extract_samples(decoded))
}

/// Normalize a decoded image to gray or interleaved RGB samples.
///
/// Gray layouts keep their raw values (16-bit stays 16-bit). Alpha is
/// dropped explicitly rather than being packed as a fourth channel; layouts
/// without a direct mapping (floating point, future additions) are converted
/// to 8-bit RGB.
pub fn extract_samples(image: DynamicImage) -> BitmapRaster {
    let layout = image.color();
    let width = image.width() as usize;
    let height = image.height() as usize;

    let (kind, samples) = match layout {
        ColorType::L8 => (ImageKind::Gray, widen(image.into_luma8().into_raw())),
        ColorType::L16 => (ImageKind::Gray, widen(image.into_luma16().into_raw())),
        ColorType::La8 => {
            debug!("Dropping alpha from {:?}", layout);
            (ImageKind::Gray, widen(image.into_luma8().into_raw()))
        }
        ColorType::La16 => {
            debug!("Dropping alpha from {:?}", layout);
            (ImageKind::Gray, widen(image.into_luma16().into_raw()))
        }
        ColorType::Rgb8 => (ImageKind::Color, widen(image.into_rgb8().into_raw())),
        ColorType::Rgb16 => (ImageKind::Color, widen(image.into_rgb16().into_raw())),
        ColorType::Rgba8 => {
            debug!("Dropping alpha from {:?}", layout);
            (ImageKind::Color, widen(image.into_rgb8().into_raw()))
        }
        ColorType::Rgba16 => {
            debug!("Dropping alpha from {:?}", layout);
            (ImageKind::Color, widen(image.into_rgb16().into_raw()))
        }
        other => {
            warn!("Pixel layout {:?} converted to 8-bit RGB", other);
            (ImageKind::Color, widen(image.into_rgb8().into_raw()))
        }
    };

    BitmapRaster {
        width,
        height,
        layout,
        kind,
        samples,
    }
}

fn widen<T: Copy + Into<i32>>(raw: Vec<T>) -> Vec<i32> {
    raw.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, LumaA, Rgb, Rgb32FImage, Rgba};

    #[test]
    fn test_gray8_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        ImageBuffer::<Luma<u8>, _>::from_raw(3, 1, vec![0u8, 128, 255])
            .unwrap()
            .save(&path)
            .unwrap();

        let raster = read_bitmap(&path).unwrap();
        assert_eq!(raster.layout, ColorType::L8);
        assert_eq!(raster.kind, ImageKind::Gray);
        assert_eq!((raster.width, raster.height), (3, 1));
        assert_eq!(raster.samples, vec![0, 128, 255]);
    }

    #[test]
    fn test_gray16_keeps_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep.png");
        ImageBuffer::<Luma<u16>, _>::from_raw(2, 1, vec![7u16, 60000])
            .unwrap()
            .save(&path)
            .unwrap();

        let raster = read_bitmap(&path).unwrap();
        assert_eq!(raster.layout, ColorType::L16);
        assert_eq!(raster.samples, vec![7, 60000]);
    }

    #[test]
    fn test_rgba_drops_alpha() {
        let image = DynamicImage::ImageRgba8(
            ImageBuffer::<Rgba<u8>, _>::from_raw(2, 1, vec![1u8, 2, 3, 0, 4, 5, 6, 255]).unwrap(),
        );
        let raster = extract_samples(image);
        assert_eq!(raster.kind, ImageKind::Color);
        assert_eq!(raster.samples, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_gray_alpha_is_gray() {
        let image = DynamicImage::ImageLumaA8(
            ImageBuffer::<LumaA<u8>, _>::from_raw(2, 1, vec![9u8, 0, 200, 128]).unwrap(),
        );
        let raster = extract_samples(image);
        assert_eq!(raster.kind, ImageKind::Gray);
        assert_eq!(raster.samples, vec![9, 200]);
    }

    #[test]
    fn test_float_layout_falls_back_to_rgb8() {
        let image = DynamicImage::ImageRgb32F(
            Rgb32FImage::from_raw(1, 1, vec![1.0f32, 0.0, 0.0]).unwrap(),
        );
        let raster = extract_samples(image);
        assert_eq!(raster.layout, ColorType::Rgb32F);
        assert_eq!(raster.kind, ImageKind::Color);
        assert_eq!(raster.samples, vec![255, 0, 0]);
    }

    #[test]
    fn test_format_sniffed_from_content() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("color.png");
        ImageBuffer::<Rgb<u8>, _>::from_raw(1, 1, vec![10u8, 20, 30])
            .unwrap()
            .save(&png)
            .unwrap();
        let renamed = dir.path().join("color.dat");
        std::fs::rename(&png, &renamed).unwrap();

        let raster = read_bitmap(&renamed).unwrap();
        assert_eq!(raster.kind, ImageKind::Color);
        assert_eq!(raster.samples, vec![10, 20, 30]);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        assert!(matches!(read_bitmap(&path), Err(ImageError::Decode { .. })));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.png");
        assert!(matches!(read_bitmap(&path), Err(ImageError::Io(_))));
    }
}
