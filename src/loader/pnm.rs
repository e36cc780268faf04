//! Netpbm (PBM/PGM/PPM) decoder
//!
//! Handles the plain (`P1`–`P3`) and raw (`P4`–`P6`) variants. Samples are
//! returned exactly as stored: 16-bit data keeps its range and nothing is
//! rescaled to maxval. Bitmaps map black to 0 and white to 255.

use std::fs;
use std::path::Path;

use crate::error::{ImageError, Result};
use crate::image_data::sample_bounds;

/// Extensions routed to this decoder (compared case-insensitively)
pub const PNM_EXTENSIONS: [&str; 3] = ["pgm", "ppm", "pnm"];

/// Decoded netpbm raster
#[derive(Debug, Clone, PartialEq)]
pub struct PnmRaster {
    pub width: usize,
    pub height: usize,
    /// 1 for bitmaps and graymaps, 3 for pixmaps
    pub samples_per_pixel: usize,
    /// Declared maximum sample value (1 for bitmaps)
    pub maxval: u32,
    /// Smallest decoded sample
    pub min: i32,
    /// Largest decoded sample
    pub max: i32,
    /// `width * height * samples_per_pixel` interleaved samples
    pub samples: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Magic {
    PlainBitmap,
    PlainGray,
    PlainColor,
    RawBitmap,
    RawGray,
    RawColor,
}

impl Magic {
    fn parse(token: &[u8]) -> Option<Self> {
        match token {
            b"P1" => Some(Magic::PlainBitmap),
            b"P2" => Some(Magic::PlainGray),
            b"P3" => Some(Magic::PlainColor),
            b"P4" => Some(Magic::RawBitmap),
            b"P5" => Some(Magic::RawGray),
            b"P6" => Some(Magic::RawColor),
            _ => None,
        }
    }

    fn samples_per_pixel(self) -> usize {
        match self {
            Magic::PlainColor | Magic::RawColor => 3,
            _ => 1,
        }
    }

    fn is_bitmap(self) -> bool {
        matches!(self, Magic::PlainBitmap | Magic::RawBitmap)
    }
}

/// True if `path` has one of the netpbm extensions
pub fn is_pnm_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| PNM_EXTENSIONS.contains(&ext.as_str()))
}

/// Read and decode a netpbm file
pub fn read_pnm(path: &Path) -> Result<PnmRaster> {
    let bytes = fs::read(path)?;
    decode_pnm(&bytes).map_err(|reason| ImageError::MalformedRaster {
        path: path.to_path_buf(),
        reason,
    })
}

/// Decode an in-memory netpbm file
pub fn decode_pnm(bytes: &[u8]) -> std::result::Result<PnmRaster, String> {
    let mut cursor = Cursor { bytes, pos: 0 };

    let magic_token = cursor.token().ok_or("missing magic number")?;
    let magic = Magic::parse(magic_token)
        .ok_or_else(|| format!("unknown magic number {:?}", String::from_utf8_lossy(magic_token)))?;

    let width = cursor.header_value("width")?;
    let height = cursor.header_value("height")?;
    let maxval = if magic.is_bitmap() {
        1
    } else {
        cursor.header_value("maxval")?
    };

    if width == 0 || height == 0 {
        return Err(format!("invalid dimensions {}x{}", width, height));
    }
    if maxval == 0 || maxval > u16::MAX as u32 {
        return Err(format!("maxval {} outside 1..=65535", maxval));
    }

    let width = width as usize;
    let height = height as usize;
    let samples_per_pixel = magic.samples_per_pixel();
    let count = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(samples_per_pixel))
        .ok_or_else(|| format!("image {}x{} is too large", width, height))?;

    let samples = match magic {
        Magic::PlainBitmap => cursor.plain_bits(count)?,
        Magic::PlainGray | Magic::PlainColor => cursor.plain_samples(count)?,
        Magic::RawBitmap => {
            cursor.single_whitespace()?;
            cursor.raw_bits(width, height)?
        }
        Magic::RawGray | Magic::RawColor => {
            cursor.single_whitespace()?;
            cursor.raw_samples(count, maxval)?
        }
    };

    let (min, max) = sample_bounds(&samples).ok_or("no samples")?;

    Ok(PnmRaster {
        width,
        height,
        samples_per_pixel,
        maxval,
        min,
        max,
        samples,
    })
}

const BLACK: i32 = 0;
const WHITE: i32 = 255;

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Skip whitespace and `#` comments
    fn skip_blank(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b == b'#' {
                while let Some(&c) = self.bytes.get(self.pos) {
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                    self.pos += 1;
                }
            } else if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn token(&mut self) -> Option<&'a [u8]> {
        self.skip_blank();
        let start = self.pos;
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() || b == b'#' {
                break;
            }
            self.pos += 1;
        }
        if self.pos > start {
            Some(&self.bytes[start..self.pos])
        } else {
            None
        }
    }

    fn header_value(&mut self, name: &str) -> std::result::Result<u32, String> {
        let token = self.token().ok_or_else(|| format!("missing {}", name))?;
        std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| format!("invalid {} {:?}", name, String::from_utf8_lossy(token)))
    }

    /// Raw data starts after exactly one whitespace byte following the header
    fn single_whitespace(&mut self) -> std::result::Result<(), String> {
        match self.bytes.get(self.pos) {
            Some(b) if b.is_ascii_whitespace() => {
                self.pos += 1;
                Ok(())
            }
            _ => Err("missing whitespace before raster data".to_string()),
        }
    }

    fn plain_samples(&mut self, count: usize) -> std::result::Result<Vec<i32>, String> {
        let mut samples = Vec::with_capacity(count.min(self.bytes.len()));
        for i in 0..count {
            let token = self
                .token()
                .ok_or_else(|| format!("expected {} samples, found {}", count, i))?;
            let value = std::str::from_utf8(token)
                .ok()
                .and_then(|s| s.parse::<i32>().ok())
                .ok_or_else(|| format!("invalid sample {:?}", String::from_utf8_lossy(token)))?;
            samples.push(value);
        }
        Ok(samples)
    }

    /// Plain bitmaps may run digits together ("0110"), so read one at a time
    fn plain_bits(&mut self, count: usize) -> std::result::Result<Vec<i32>, String> {
        let mut samples = Vec::with_capacity(count.min(self.bytes.len()));
        while samples.len() < count {
            self.skip_blank();
            match self.bytes.get(self.pos) {
                Some(b'0') => samples.push(WHITE),
                Some(b'1') => samples.push(BLACK),
                Some(&b) => return Err(format!("invalid bit {:?}", b as char)),
                None => {
                    return Err(format!("expected {} samples, found {}", count, samples.len()))
                }
            }
            self.pos += 1;
        }
        Ok(samples)
    }

    fn take(&mut self, len: usize) -> std::result::Result<&'a [u8], String> {
        let end = self.pos.saturating_add(len);
        let data = self
            .bytes
            .get(self.pos..end)
            .ok_or_else(|| {
                format!(
                    "raster data truncated: need {} bytes, have {}",
                    len,
                    self.bytes.len() - self.pos
                )
            })?;
        self.pos = end;
        Ok(data)
    }

    fn raw_bits(&mut self, width: usize, height: usize) -> std::result::Result<Vec<i32>, String> {
        let row_bytes = width.div_ceil(8);
        let data = self.take(row_bytes.saturating_mul(height))?;
        let mut samples = Vec::with_capacity(width * height);
        for row in data.chunks_exact(row_bytes) {
            for col in 0..width {
                let bit = (row[col / 8] >> (7 - col % 8)) & 1;
                samples.push(if bit == 1 { BLACK } else { WHITE });
            }
        }
        Ok(samples)
    }

    fn raw_samples(&mut self, count: usize, maxval: u32) -> std::result::Result<Vec<i32>, String> {
        if maxval < 256 {
            let data = self.take(count)?;
            Ok(data.iter().map(|&b| b as i32).collect())
        } else {
            let data = self.take(count.saturating_mul(2))?;
            Ok(data
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]) as i32)
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pnm_path() {
        assert!(is_pnm_path(Path::new("a.pgm")));
        assert!(is_pnm_path(Path::new("/x/y/B.PPM")));
        assert!(is_pnm_path(Path::new("c.Pnm")));
        assert!(!is_pnm_path(Path::new("d.png")));
        assert!(!is_pnm_path(Path::new("pgm")));
    }

    #[test]
    fn test_plain_gray_with_comments() {
        let raster = decode_pnm(b"P2\n# made by hand\n3 2\n# max\n65535\n0 10 20\n300 40000 5\n").unwrap();
        assert_eq!((raster.width, raster.height, raster.samples_per_pixel), (3, 2, 1));
        assert_eq!(raster.maxval, 65535);
        assert_eq!(raster.samples, vec![0, 10, 20, 300, 40000, 5]);
        assert_eq!((raster.min, raster.max), (0, 40000));
    }

    #[test]
    fn test_plain_gray_keeps_negative_samples() {
        let raster = decode_pnm(b"P2 2 1 255 -3 7").unwrap();
        assert_eq!(raster.samples, vec![-3, 7]);
        assert_eq!(raster.min, -3);
    }

    #[test]
    fn test_plain_color() {
        let raster = decode_pnm(b"P3\n2 1\n255\n255 0 0  0 0 255\n").unwrap();
        assert_eq!(raster.samples_per_pixel, 3);
        assert_eq!(raster.samples, vec![255, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn test_plain_bitmap_runs_together() {
        let raster = decode_pnm(b"P1\n4 1\n0110\n").unwrap();
        assert_eq!(raster.maxval, 1);
        assert_eq!(raster.samples, vec![255, 0, 0, 255]);
    }

    #[test]
    fn test_raw_gray_8bit() {
        let mut file = b"P5\n2 2\n255\n".to_vec();
        file.extend_from_slice(&[0, 128, 200, 255]);
        let raster = decode_pnm(&file).unwrap();
        assert_eq!(raster.samples, vec![0, 128, 200, 255]);
    }

    #[test]
    fn test_raw_color_16bit_big_endian() {
        let mut file = b"P6 1 1 1023\n".to_vec();
        file.extend_from_slice(&[0x03, 0xff, 0x00, 0x10, 0x01, 0x00]);
        let raster = decode_pnm(&file).unwrap();
        assert_eq!(raster.samples, vec![1023, 16, 256]);
        assert_eq!((raster.min, raster.max), (16, 1023));
    }

    #[test]
    fn test_raw_data_may_start_with_whitespace_byte() {
        // Sample value 10 is '\n'; only one separator byte may be skipped
        let mut file = b"P5 2 1 255\n".to_vec();
        file.extend_from_slice(&[10, 32]);
        let raster = decode_pnm(&file).unwrap();
        assert_eq!(raster.samples, vec![10, 32]);
    }

    #[test]
    fn test_raw_bitmap_rows_are_byte_padded() {
        let mut file = b"P4\n10 2\n".to_vec();
        file.extend_from_slice(&[0b1000_0000, 0b0100_0000, 0b0000_0001, 0b1100_0000]);
        let raster = decode_pnm(&file).unwrap();
        let mut expected = vec![255; 20];
        expected[0] = 0;
        expected[9] = 0;
        expected[17] = 0;
        expected[18] = 0;
        expected[19] = 0;
        assert_eq!(raster.samples, expected);
    }

    #[test]
    fn test_truncated_raw_data() {
        let mut file = b"P5 4 4 255\n".to_vec();
        file.extend_from_slice(&[1, 2, 3]);
        let err = decode_pnm(&file).unwrap_err();
        assert!(err.contains("truncated"), "{}", err);
    }

    #[test]
    fn test_missing_plain_samples() {
        let err = decode_pnm(b"P2 2 2 255 1 2 3").unwrap_err();
        assert!(err.contains("expected 4 samples, found 3"), "{}", err);
    }

    #[test]
    fn test_rejects_bad_header() {
        assert!(decode_pnm(b"").is_err());
        assert!(decode_pnm(b"P9 1 1 255 0").is_err());
        assert!(decode_pnm(b"P2 0 3 255").is_err());
        assert!(decode_pnm(b"P2 x 3 255 0").is_err());
        assert!(decode_pnm(b"P2 1 1 0 0").is_err());
    }

    #[test]
    fn test_read_pnm_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pgm");
        fs::write(&path, b"P2 2 2").unwrap();

        match read_pnm(&path) {
            Err(ImageError::MalformedRaster { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected MalformedRaster, got {:?}", other),
        }
    }
}
