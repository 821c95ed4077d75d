//! Pure calculation functions for crop and margin geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! The central subtlety: crop rectangles arrive in *display* coordinates
//! (the image as rendered by the cropping widget), while pixels are copied
//! from the image's *natural* resolution. Doing the math in the wrong space
//! distorts the crop whenever the widget rendered the image scaled.

use super::params::{CanvasSpec, CropRect, Dimensions};

/// A pixel region in the source image's natural coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Natural-to-display scale factors `(scale_x, scale_y)`.
///
/// 1.0 on both axes means the widget rendered the image at its intrinsic
/// pixel size.
pub fn scale_factors(natural: Dimensions, display: Dimensions) -> (f64, f64) {
    (
        natural.width as f64 / display.width as f64,
        natural.height as f64 / display.height as f64,
    )
}

/// Output dimensions of a crop: the display-space rect rounded to pixels.
///
/// Returns `None` when either side rounds to zero.
pub fn output_dimensions(rect: &CropRect) -> Option<Dimensions> {
    let width = rect.width.round();
    let height = rect.height.round();
    if width < 1.0 || height < 1.0 {
        return None;
    }
    Some(Dimensions::new(width as u32, height as u32))
}

/// Map a display-space crop rect into the source's natural pixel space,
/// clipped to the source bounds.
///
/// A rect that partially overlaps the source is clipped (canvas `drawImage`
/// semantics); `None` means the rect is degenerate or lies entirely outside
/// the source.
pub fn map_to_natural(
    rect: &CropRect,
    natural: Dimensions,
    display: Dimensions,
) -> Option<NativeRegion> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }

    let (scale_x, scale_y) = scale_factors(natural, display);

    let left = rect.x * scale_x;
    let top = rect.y * scale_y;
    let right = left + rect.width * scale_x;
    let bottom = top + rect.height * scale_y;

    // Clip to the source. An empty intersection means nothing to copy.
    let left = left.max(0.0);
    let top = top.max(0.0);
    let right = right.min(natural.width as f64);
    let bottom = bottom.min(natural.height as f64);
    if right <= left || bottom <= top {
        return None;
    }

    // Rounding can push coordinates one pixel past the edge; clamp back so
    // the region always addresses real pixels.
    let x = (left.round() as u32).min(natural.width - 1);
    let y = (top.round() as u32).min(natural.height - 1);
    let width = ((right - left).round() as u32).clamp(1, natural.width - x);
    let height = ((bottom - top).round() as u32).clamp(1, natural.height - y);

    Some(NativeRegion {
        x,
        y,
        width,
        height,
    })
}

/// Top-left offset of the centered inner square on the padded canvas.
///
/// The canvas is square and the inner region is square, so the offset is the
/// margin on both axes.
pub fn inner_offset(canvas: &CanvasSpec) -> (u32, u32) {
    let margin = canvas.margin();
    (margin, margin)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // scale_factors tests
    // =========================================================================

    #[test]
    fn scale_identity_when_display_matches_natural() {
        let dims = Dimensions::new(200, 200);
        assert_eq!(scale_factors(dims, dims), (1.0, 1.0));
    }

    #[test]
    fn scale_doubles_when_display_is_half_size() {
        let natural = Dimensions::new(2000, 1000);
        let display = Dimensions::new(1000, 500);
        assert_eq!(scale_factors(natural, display), (2.0, 2.0));
    }

    #[test]
    fn scale_axes_are_independent() {
        let natural = Dimensions::new(3000, 1000);
        let display = Dimensions::new(1000, 1000);
        assert_eq!(scale_factors(natural, display), (3.0, 1.0));
    }

    // =========================================================================
    // map_to_natural tests
    // =========================================================================

    #[test]
    fn map_identity_scale_passes_through() {
        let dims = Dimensions::new(200, 200);
        let rect = CropRect::new(10.0, 10.0, 100.0, 100.0);
        let region = map_to_natural(&rect, dims, dims).unwrap();
        assert_eq!(
            region,
            NativeRegion {
                x: 10,
                y: 10,
                width: 100,
                height: 100
            }
        );
    }

    #[test]
    fn map_scales_into_natural_space() {
        // Display 500x500 of a 1000x1000 natural image: everything doubles.
        let natural = Dimensions::new(1000, 1000);
        let display = Dimensions::new(500, 500);
        let rect = CropRect::new(50.0, 25.0, 200.0, 100.0);
        let region = map_to_natural(&rect, natural, display).unwrap();
        assert_eq!(
            region,
            NativeRegion {
                x: 100,
                y: 50,
                width: 400,
                height: 200
            }
        );
    }

    #[test]
    fn map_clips_partial_overlap() {
        let dims = Dimensions::new(100, 100);
        // Hangs off the right and bottom edges.
        let rect = CropRect::new(80.0, 90.0, 50.0, 50.0);
        let region = map_to_natural(&rect, dims, dims).unwrap();
        assert_eq!(
            region,
            NativeRegion {
                x: 80,
                y: 90,
                width: 20,
                height: 10
            }
        );
    }

    #[test]
    fn map_clips_negative_origin() {
        let dims = Dimensions::new(100, 100);
        let rect = CropRect::new(-20.0, -20.0, 50.0, 50.0);
        let region = map_to_natural(&rect, dims, dims).unwrap();
        assert_eq!(
            region,
            NativeRegion {
                x: 0,
                y: 0,
                width: 30,
                height: 30
            }
        );
    }

    #[test]
    fn map_rejects_zero_width() {
        let dims = Dimensions::new(100, 100);
        let rect = CropRect::new(10.0, 10.0, 0.0, 50.0);
        assert!(map_to_natural(&rect, dims, dims).is_none());
    }

    #[test]
    fn map_rejects_entirely_outside() {
        let dims = Dimensions::new(100, 100);
        let rect = CropRect::new(200.0, 200.0, 50.0, 50.0);
        assert!(map_to_natural(&rect, dims, dims).is_none());
    }

    #[test]
    fn map_handles_fractional_display_pixels() {
        // The cropping widget reports fractional pixels at odd zoom levels.
        let dims = Dimensions::new(300, 300);
        let rect = CropRect::new(10.4, 10.6, 99.5, 99.5);
        let region = map_to_natural(&rect, dims, dims).unwrap();
        assert_eq!(region.x, 10);
        assert_eq!(region.y, 11);
        assert_eq!(region.width, 100);
        assert_eq!(region.height, 100);
    }

    // =========================================================================
    // output_dimensions tests
    // =========================================================================

    #[test]
    fn output_dimensions_round_display_rect() {
        let rect = CropRect::new(0.0, 0.0, 100.4, 99.6);
        assert_eq!(output_dimensions(&rect), Some(Dimensions::new(100, 100)));
    }

    #[test]
    fn output_dimensions_reject_degenerate() {
        assert!(output_dimensions(&CropRect::new(0.0, 0.0, 0.0, 100.0)).is_none());
        assert!(output_dimensions(&CropRect::new(0.0, 0.0, 100.0, 0.2)).is_none());
    }

    // =========================================================================
    // inner_offset tests
    // =========================================================================

    #[test]
    fn inner_offset_centers_default_canvas() {
        assert_eq!(inner_offset(&CanvasSpec::default()), (128, 128));
    }

    #[test]
    fn inner_offset_centers_custom_canvas() {
        let canvas = CanvasSpec {
            size: 512,
            inner_size: 384,
            fill: [255, 255, 255],
        };
        assert_eq!(inner_offset(&canvas), (64, 64));
    }
}
