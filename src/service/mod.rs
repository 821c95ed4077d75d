//! The generation-service boundary.
//!
//! Everything the studio asks of the external models goes through the
//! [`GenerativeBackend`] trait; [`GeminiClient`] is the production
//! implementation. The rest of the crate never touches HTTP directly.

pub mod backend;
pub mod gemini;

pub use backend::{
    CoachRequest, FrameRequest, GeneratedImage, GenerativeBackend, ServiceError, ThemeRequest,
};
pub use gemini::GeminiClient;
