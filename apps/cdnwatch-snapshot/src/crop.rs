//! PNG cropping for captured component screenshots.

use std::io::Cursor;

use image::ImageFormat;

use crate::capture::SnapshotError;

/// Crop a PNG to at most `width` x `height` pixels, anchored top-left.
///
/// Screenshots narrower or shorter than the requested box are kept as-is
/// along that axis rather than padded.
///
/// # Errors
///
/// Returns [`SnapshotError::Image`] when the bytes are not a decodable image
/// or the cropped result cannot be re-encoded.
pub fn crop_png(png: &[u8], width: u32, height: u32) -> Result<Vec<u8>, SnapshotError> {
    let full = image::load_from_memory(png)?;
    let crop_width = width.min(full.width());
    let crop_height = height.min(full.height());
    let cropped = full.crop_imm(0, 0, crop_width, crop_height);

    let mut out = Cursor::new(Vec::new());
    cropped.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png_of(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_should_crop_to_requested_box() {
        let cropped = crop_png(&png_of(1920, 1080), 1280, 355).unwrap();
        let img = image::load_from_memory(&cropped).unwrap();
        assert_eq!(img.width(), 1280);
        assert_eq!(img.height(), 355);
    }

    #[test]
    fn test_should_keep_smaller_images_unpadded() {
        let cropped = crop_png(&png_of(800, 200), 1280, 355).unwrap();
        let img = image::load_from_memory(&cropped).unwrap();
        assert_eq!(img.width(), 800);
        assert_eq!(img.height(), 200);
    }

    #[test]
    fn test_should_reject_non_image_bytes() {
        let result = crop_png(b"not a png", 1280, 355);
        assert!(matches!(result, Err(SnapshotError::Image(_))));
    }
}
