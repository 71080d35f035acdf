//! Image carriers (PNG, BMP) via the `image` crate.
//!
//! Images are decoded to 8-bit RGB, or RGBA when the source has an alpha
//! channel, so channel 0/1/2 are always red/green/blue. Output is always PNG:
//! a lossy format would destroy the hidden bits.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};

use super::MediaError;
use crate::stego::PixelGrid;

/// Decodes in-memory image bytes into a pixel grid.
pub fn load_bytes(bytes: &[u8]) -> Result<PixelGrid, MediaError> {
    let image =
        image::load_from_memory(bytes).map_err(|e| MediaError::ImageLoad(e.to_string()))?;
    from_image(image)
}

/// Converts a decoded image into a pixel grid.
pub fn from_image(image: DynamicImage) -> Result<PixelGrid, MediaError> {
    let (width, height, channels, data) = if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        let (w, h) = rgba.dimensions();
        (w, h, 4, rgba.into_raw())
    } else {
        let rgb = image.to_rgb8();
        let (w, h) = rgb.dimensions();
        (w, h, 3, rgb.into_raw())
    };
    Ok(PixelGrid::new(width, height, channels, data)?)
}

/// Converts a pixel grid back into an image.
pub fn to_image(grid: &PixelGrid) -> Result<DynamicImage, MediaError> {
    let (w, h) = (grid.width(), grid.height());
    let data = grid.as_bytes().to_vec();
    let image = match grid.channels() {
        3 => RgbImage::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
        4 => RgbaImage::from_raw(w, h, data).map(DynamicImage::ImageRgba8),
        n => {
            return Err(MediaError::ImageSave(format!(
                "cannot write a {}-channel pixel grid",
                n
            )))
        }
    };
    image.ok_or_else(|| MediaError::ImageSave("pixel buffer does not match dimensions".to_string()))
}

/// Encodes a pixel grid as PNG bytes.
pub fn to_png_bytes(grid: &PixelGrid) -> Result<Vec<u8>, MediaError> {
    let mut bytes = Vec::new();
    to_image(grid)?
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| MediaError::ImageSave(e.to_string()))?;
    Ok(bytes)
}
