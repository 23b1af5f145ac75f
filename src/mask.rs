use std::path::Path;

use image::{GrayImage, ImageReader, ImageResult};
use imageproc::contrast::{ThresholdType, threshold as ip_threshold};

/// Decode any supported raster file and convert it to 8-bit luminance.
///
/// The format is guessed from the file content, so a mislabelled file still decodes.
pub fn load_grayscale(path: &Path) -> ImageResult<GrayImage> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(image.to_luma8())
}

/// Threshold the grayscale image: values above `thr` become 255, the rest become 0.
pub fn threshold_mask(gray: &GrayImage, thr: u8) -> GrayImage {
    ip_threshold(gray, thr, ThresholdType::Binary)
}

/// A foreground/background grid with the dimensions of its source image.
///
/// `true` marks foreground: a dark pixel that the tracer outlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl BinaryMask {
    /// An all-background mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    /// Classify every sample at or below `thr` as foreground.
    pub fn from_gray(gray: &GrayImage, thr: u8) -> Self {
        let (width, height) = gray.dimensions();
        let bits = threshold_mask(gray, thr)
            .pixels()
            .map(|px| px.0[0] == 0)
            .collect();
        Self {
            width,
            height,
            bits,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Foreground test; coordinates outside the grid read as background.
    pub fn get(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.bits[i])
    }

    pub fn set(&mut self, x: i32, y: i32, value: bool) {
        if let Some(i) = self.index(x, y) {
            self.bits[i] = value;
        }
    }

    pub fn toggle(&mut self, x: i32, y: i32) {
        if let Some(i) = self.index(x, y) {
            self.bits[i] = !self.bits[i];
        }
    }

    /// First foreground pixel at or after `(x, y)` in row-major order.
    pub fn find_from(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        let start = self.index(x, y)?;
        let w = self.width as usize;
        self.bits[start..]
            .iter()
            .position(|&b| b)
            .map(|offset| {
                let i = start + offset;
                ((i % w) as i32, (i / w) as i32)
            })
    }

    pub fn foreground_count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// True when there is nothing to trace.
    pub fn is_blank(&self) -> bool {
        !self.bits.iter().any(|&b| b)
    }
}
