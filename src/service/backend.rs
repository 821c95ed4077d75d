//! Generation-service trait and shared request/response types.
//!
//! The [`GenerativeBackend`] trait defines the three calls the studio makes:
//! frame generation (image in, image out), theme generation (structured
//! JSON out), and the coach assistant (text out).
//!
//! The production implementation is
//! [`GeminiClient`](super::gemini::GeminiClient). Everything above this
//! seam is network-agnostic, so pipeline tests run against a mock.

use crate::types::{SamplingParams, Theme, Tone};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// The configured API key environment variable is unset or empty.
    #[error("generation API key not set: export {0}")]
    MissingApiKey(String),
    /// The request never completed (DNS, TLS, timeout, connection loss).
    #[error("generation request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("generation service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    /// The call succeeded but the response carried no usable image.
    #[error("no image data in generation response")]
    NoImage,
    /// The response body could not be interpreted.
    #[error("malformed generation response: {0}")]
    MalformedResponse(String),
}

/// Request for one frame generation: the padded composite plus the composed
/// prompt, with sampling passed through opaquely.
#[derive(Debug, Clone)]
pub struct FrameRequest {
    /// JPEG bytes of the padded 1024x1024 composite.
    pub image_jpeg: Vec<u8>,
    /// Final prompt from [`crate::prompt::compose_frame_prompt`].
    pub prompt: String,
    pub sampling: SamplingParams,
}

/// Opaque image payload returned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Request to generate a complete theme from a free-text style description.
#[derive(Debug, Clone)]
pub struct ThemeRequest {
    /// The user's style description.
    pub description: String,
    /// System instruction; defaults to
    /// [`crate::prompt::THEME_GENERATION_SYSTEM_INSTRUCTION`].
    pub system_instruction: String,
}

/// Request for the coach assistant.
#[derive(Debug, Clone)]
pub struct CoachRequest {
    pub question: String,
    pub tone: Tone,
    /// Live app configuration embedded into the system instruction so the
    /// coach answers about the session's actual settings.
    pub app_config: serde_json::Value,
    /// Optional photo for context (JPEG bytes).
    pub image_jpeg: Option<Vec<u8>>,
}

/// The seam to the external generation service.
///
/// One call per invocation: no retry, no backoff, no cancellation. Callers
/// surface errors to the user and return to a prior interactive step.
pub trait GenerativeBackend {
    /// Paint a frame into the composite's blank margin.
    fn generate_frame(&self, request: &FrameRequest) -> Result<GeneratedImage, ServiceError>;

    /// Generate a complete theme from a style description.
    fn generate_theme(&self, request: &ThemeRequest) -> Result<Theme, ServiceError>;

    /// Ask the coach assistant a question about the app or prompting.
    fn ask_coach(&self, request: &CoachRequest) -> Result<String, ServiceError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock service that records calls and replays queued results.
    /// Uses Mutex so shared references stay usable across helpers.
    #[derive(Default)]
    pub struct MockService {
        pub frame_results: Mutex<Vec<Result<GeneratedImage, ServiceError>>>,
        pub theme_results: Mutex<Vec<Theme>>,
        pub coach_results: Mutex<Vec<String>>,
        pub calls: Mutex<Vec<RecordedCall>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedCall {
        Frame {
            prompt: String,
            image_bytes: usize,
            temperature: f64,
            top_k: u32,
        },
        Theme {
            description: String,
        },
        Coach {
            question: String,
            tone: Tone,
            has_image: bool,
        },
    }

    impl MockService {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_frame_result(result: Result<GeneratedImage, ServiceError>) -> Self {
            let mock = Self::default();
            mock.frame_results.lock().unwrap().push(result);
            mock
        }

        pub fn recorded_calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl GenerativeBackend for MockService {
        fn generate_frame(&self, request: &FrameRequest) -> Result<GeneratedImage, ServiceError> {
            self.calls.lock().unwrap().push(RecordedCall::Frame {
                prompt: request.prompt.clone(),
                image_bytes: request.image_jpeg.len(),
                temperature: request.sampling.temperature,
                top_k: request.sampling.top_k,
            });
            self.frame_results
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(ServiceError::NoImage))
        }

        fn generate_theme(&self, request: &ThemeRequest) -> Result<Theme, ServiceError> {
            self.calls.lock().unwrap().push(RecordedCall::Theme {
                description: request.description.clone(),
            });
            self.theme_results
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| ServiceError::MalformedResponse("no mock theme queued".into()))
        }

        fn ask_coach(&self, request: &CoachRequest) -> Result<String, ServiceError> {
            self.calls.lock().unwrap().push(RecordedCall::Coach {
                question: request.question.clone(),
                tone: request.tone,
                has_image: request.image_jpeg.is_some(),
            });
            self.coach_results
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| ServiceError::MalformedResponse("no mock answer queued".into()))
        }
    }

    #[test]
    fn mock_records_frame_calls() {
        let mock = MockService::with_frame_result(Ok(GeneratedImage {
            bytes: vec![1, 2, 3],
            mime_type: "image/png".into(),
        }));

        let result = mock
            .generate_frame(&FrameRequest {
                image_jpeg: vec![0; 64],
                prompt: "paint a frame".into(),
                sampling: SamplingParams::default(),
            })
            .unwrap();
        assert_eq!(result.bytes, vec![1, 2, 3]);

        let calls = mock.recorded_calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            &calls[0],
            RecordedCall::Frame { prompt, image_bytes: 64, top_k: 40, .. }
                if prompt == "paint a frame"
        ));
    }

    #[test]
    fn mock_exhausted_frame_queue_reports_no_image() {
        let mock = MockService::new();
        let err = mock
            .generate_frame(&FrameRequest {
                image_jpeg: Vec::new(),
                prompt: String::new(),
                sampling: SamplingParams::default(),
            })
            .unwrap_err();
        assert!(matches!(err, ServiceError::NoImage));
    }
}
