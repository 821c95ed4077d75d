//! High-level compositing operations.
//!
//! These functions combine the pure [`calculations`](super::calculations)
//! with pixel work from the `image` crate. Every operation works on
//! in-memory buffers scoped to one pipeline invocation; nothing is cached
//! or shared.

use super::calculations::{inner_offset, map_to_natural, output_dimensions};
use super::params::{CanvasSpec, CropRect, Dimensions, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompositingError {
    /// The source image could not be decoded.
    #[error("failed to decode source image: {0}")]
    Decode(String),
    /// The crop rectangle is degenerate or entirely outside the source.
    #[error("invalid crop region: {0}")]
    InvalidRegion(String),
    /// A composite could not be encoded for the next stage.
    #[error("failed to encode composite: {0}")]
    Encode(String),
}

/// Result type for compositing operations.
pub type Result<T> = std::result::Result<T, CompositingError>;

/// Decode an uploaded photo from its raw container bytes.
///
/// Format is sniffed from the bytes; anything the compiled-in decoders
/// handle (JPEG, PNG, TIFF, WebP) is accepted.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| CompositingError::Decode(e.to_string()))
}

/// Extract the crop described by `rect` (display coordinates) at the
/// source's native resolution.
///
/// The output is exactly `rect.width × rect.height` pixels (rounded). When
/// the widget rendered the image 1:1, source pixels copy through untouched;
/// otherwise the native region is resampled down to the display-space size.
/// A rect partially off the image clips; one entirely off it is an error.
pub fn crop(image: &DynamicImage, display: Dimensions, rect: &CropRect) -> Result<RgbImage> {
    let natural = Dimensions::new(image.width(), image.height());

    let out = output_dimensions(rect).ok_or_else(|| {
        CompositingError::InvalidRegion(format!(
            "crop size {:.1}x{:.1} must be at least one pixel on both sides",
            rect.width, rect.height
        ))
    })?;

    let region = map_to_natural(rect, natural, display).ok_or_else(|| {
        CompositingError::InvalidRegion(format!(
            "crop at ({:.1}, {:.1}) lies outside the {}x{} image",
            rect.x, rect.y, display.width, display.height
        ))
    })?;

    let extracted = image
        .crop_imm(region.x, region.y, region.width, region.height)
        .to_rgb8();

    if region.width == out.width && region.height == out.height {
        return Ok(extracted);
    }
    Ok(imageops::resize(
        &extracted,
        out.width,
        out.height,
        FilterType::Lanczos3,
    ))
}

/// Composite a cropped photo onto the padded canvas the generator expects.
///
/// The whole canvas is filled with the sentinel color, then the crop is
/// resampled to exactly the inner square and centered. The crop's aspect
/// ratio is *not* preserved: the inner region is always `inner_size²`, so a
/// non-square crop is stretched to fit. Output is always `size × size`.
pub fn add_margin(cropped: &RgbImage, canvas: &CanvasSpec) -> RgbImage {
    let mut padded = RgbImage::from_pixel(canvas.size, canvas.size, Rgb(canvas.fill));

    let inner = imageops::resize(
        cropped,
        canvas.inner_size,
        canvas.inner_size,
        FilterType::Lanczos3,
    );

    let (dx, dy) = inner_offset(canvas);
    imageops::overlay(&mut padded, &inner, i64::from(dx), i64::from(dy));

    padded
}

/// Encode a composite as JPEG, the opaque container consumed by the next
/// stage and by the generation request.
pub fn encode_jpeg(image: &RgbImage, quality: Quality) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut bytes), quality.value() as u8);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| CompositingError::Encode(e.to_string()))?;
    Ok(bytes)
}
