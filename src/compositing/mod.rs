//! Geometry compositing — deterministic raster prep for the generator.
//!
//! | Operation | What it does |
//! |---|---|
//! | **Crop** | display-space rect → native-resolution extract |
//! | **Margin** | crop → centered inner square on a sentinel-filled canvas |
//! | **Encode** | composite → JPEG bytes for the generation request |
//!
//! The module is split into:
//! - **Calculations**: pure functions for coordinate mapping (unit testable)
//! - **Parameters**: data structures describing compositing inputs
//! - **Operations**: the actual pixel work on top of the `image` crate

mod calculations;
pub mod operations;
mod params;

pub use calculations::{NativeRegion, inner_offset, map_to_natural, output_dimensions, scale_factors};
pub use operations::{CompositingError, add_margin, crop, decode, encode_jpeg};
pub use params::{CanvasSpec, CropRect, Dimensions, Quality};
