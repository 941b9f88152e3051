//! Thumbnails
//!
//! Small JPEG previews stored inline (base64) next to each photo so the
//! catalogue can render without fetching full images.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageResult, Rgb, RgbImage};

/// Longest side in pixels
pub const THUMBNAIL_MAX_SIZE: u32 = 300;

pub const THUMBNAIL_QUALITY: u8 = 80;

/// Decode `bytes`, flatten transparency onto white, shrink to fit within
/// `max_size` x `max_size` (aspect ratio kept, never upscaled) and encode as
/// JPEG. Returns standard base64 without a data URI prefix.
pub fn generate_thumbnail(bytes: &[u8], max_size: u32, quality: u8) -> ImageResult<String> {
    let decoded = image::load_from_memory(bytes)?;
    let flattened = flatten_on_white(&decoded);

    let (width, height) = flattened.dimensions();
    let resized = if width > max_size || height > max_size {
        DynamicImage::ImageRgb8(flattened)
            .resize(max_size, max_size, FilterType::Lanczos3)
            .to_rgb8()
    } else {
        flattened
    };

    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality).write_image(
        resized.as_raw(),
        resized.width(),
        resized.height(),
        ExtendedColorType::Rgb8,
    )?;

    Ok(platform::crypto::to_base64(&buffer))
}

/// Alpha-composite over a white background.
fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut out = RgbImage::new(width, height);
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = u32::from(pixel[3]);
        let blend = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
    }
    out
}
