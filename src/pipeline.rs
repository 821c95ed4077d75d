//! The one-shot framing pipeline: crop → pad → compose → generate.
//!
//! The surrounding UI used to drive these steps inline from event handlers;
//! here the whole sequence is one function over explicit inputs, callable
//! from any caller that can hand over bytes and a crop rectangle. Each
//! invocation works on fresh buffers and makes exactly one generation call;
//! on failure the caller simply returns the user to an earlier step and may
//! invoke the pipeline again from scratch.

use crate::compositing::{
    self, CanvasSpec, CompositingError, CropRect, Dimensions, Quality,
};
use crate::prompt;
use crate::service::{FrameRequest, GeneratedImage, GenerativeBackend, ServiceError};
use crate::types::{SamplingParams, Theme};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Compositing(#[from] CompositingError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Everything one framing invocation needs, gathered up front.
#[derive(Debug, Clone)]
pub struct FrameJob<'a> {
    /// The uploaded photo, still in its container format.
    pub photo: &'a [u8],
    /// Crop rectangle in display coordinates.
    pub crop: CropRect,
    /// Size the cropping widget rendered the photo at; `None` means it was
    /// shown 1:1 with its pixels.
    pub display: Option<Dimensions>,
    pub theme: &'a Theme,
    pub base_prompt: &'a str,
    pub guardrails: Option<&'a str>,
    pub sampling: SamplingParams,
    pub canvas: CanvasSpec,
    pub jpeg_quality: Quality,
}

/// Result of a successful invocation.
#[derive(Debug, Clone)]
pub struct FramedPhoto {
    /// The finished frame+photo composite from the generator.
    pub image: GeneratedImage,
    /// The padded composite that was sent, for inspection or re-display.
    pub composite_jpeg: Vec<u8>,
    /// The exact prompt that was sent.
    pub prompt: String,
}

/// Crop and pad a photo into the composite the generator expects.
///
/// This is the deterministic front half of the pipeline, also exposed on its
/// own so the composite can be inspected without spending a generation call.
pub fn prepare_composite(
    photo: &[u8],
    crop: &CropRect,
    display: Option<Dimensions>,
    canvas: &CanvasSpec,
    jpeg_quality: Quality,
) -> Result<Vec<u8>, CompositingError> {
    let image = compositing::decode(photo)?;
    let display = display.unwrap_or_else(|| Dimensions::new(image.width(), image.height()));

    let cropped = compositing::crop(&image, display, crop)?;
    let padded = compositing::add_margin(&cropped, canvas);
    compositing::encode_jpeg(&padded, jpeg_quality)
}

/// Run one complete framing invocation.
pub fn frame_photo(
    service: &impl GenerativeBackend,
    job: &FrameJob<'_>,
) -> Result<FramedPhoto, PipelineError> {
    let composite_jpeg =
        prepare_composite(job.photo, &job.crop, job.display, &job.canvas, job.jpeg_quality)?;
    log::debug!("composite ready ({} bytes)", composite_jpeg.len());

    let prompt = prompt::compose_frame_prompt(job.theme, job.base_prompt, job.guardrails);

    let image = service.generate_frame(&FrameRequest {
        image_jpeg: composite_jpeg.clone(),
        prompt: prompt.clone(),
        sampling: job.sampling,
    })?;

    Ok(FramedPhoto {
        image,
        composite_jpeg,
        prompt,
    })
}

/// Convenience check used before spending a generation call: a theme with an
/// empty prompt composes fine but produces aimless frames.
pub fn theme_is_usable(theme: &Theme) -> bool {
    !theme.prompt.trim().is_empty()
}
