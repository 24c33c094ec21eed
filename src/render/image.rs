//! Rasterized page images

use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};

use crate::document::{DocumentError, DocumentResult};
use crate::layout::geometry::POINTS_PER_INCH;

/// A rendered page: 8-bit RGB or RGBA pixels plus the resolution they were
/// rendered at.
#[derive(Debug, Clone)]
pub struct PageImage {
    pixels: DynamicImage,
    dpi: u32,
}

impl PageImage {
    /// Wrap pixels, converting any other colour representation to RGB
    pub fn new(pixels: DynamicImage, dpi: u32) -> Self {
        Self {
            pixels: normalize_color(pixels),
            dpi,
        }
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn width_px(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height_px(&self) -> u32 {
        self.pixels.height()
    }

    /// Physical width in points (`px × 72 / dpi`)
    pub fn width_pt(&self) -> f64 {
        px_to_pt(self.width_px(), self.dpi)
    }

    /// Physical height in points
    pub fn height_pt(&self) -> f64 {
        px_to_pt(self.height_px(), self.dpi)
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self.pixels, DynamicImage::ImageRgba8(_))
    }

    /// Interleaved RGB samples
    pub fn rgb_samples(&self) -> Vec<u8> {
        match &self.pixels {
            DynamicImage::ImageRgb8(img) => img.as_raw().clone(),
            other => other.to_rgb8().into_raw(),
        }
    }

    /// Alpha channel, if any
    pub fn alpha_samples(&self) -> Option<Vec<u8>> {
        match &self.pixels {
            DynamicImage::ImageRgba8(img) => Some(img.pixels().map(|p| p[3]).collect()),
            _ => None,
        }
    }
}

/// Pixel count for a length in points at `dpi`
pub fn pt_to_px(points: f64, dpi: u32) -> u32 {
    (points * f64::from(dpi) / POINTS_PER_INCH).round().max(0.0) as u32
}

/// Length in points of `px` pixels at `dpi`
pub fn px_to_pt(px: u32, dpi: u32) -> f64 {
    if dpi == 0 {
        return 0.0;
    }
    f64::from(px) * POINTS_PER_INCH / f64::from(dpi)
}

/// Keep 8-bit RGB and RGBA as they are; widen RGBA of other depths to 8-bit
/// RGBA and convert everything else to 8-bit RGB.
pub fn normalize_color(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => img,
        DynamicImage::ImageRgba16(_) | DynamicImage::ImageRgba32F(_) => {
            DynamicImage::ImageRgba8(img.to_rgba8())
        }
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

/// Build an image from raw interleaved samples with `n` components per pixel
pub fn image_from_samples(
    samples: &[u8],
    width: u32,
    height: u32,
    n: usize,
) -> DocumentResult<DynamicImage> {
    let expected = width as usize * height as usize * n;
    if samples.len() < expected {
        return Err(DocumentError::ImageError(format!(
            "pixmap holds {} bytes, expected {}",
            samples.len(),
            expected
        )));
    }
    let data = samples[..expected].to_vec();

    let img = match n {
        1 => GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8),
        2 => GrayAlphaImage::from_raw(width, height, data).map(DynamicImage::ImageLumaA8),
        3 => RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8),
        4 => RgbaImage::from_raw(width, height, data).map(DynamicImage::ImageRgba8),
        other => {
            return Err(DocumentError::ImageError(format!(
                "unsupported component count: {}",
                other
            )))
        }
    };

    img.ok_or_else(|| DocumentError::ImageError("Failed to create image buffer".to_string()))
}
