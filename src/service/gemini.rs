//! Gemini REST implementation of [`GenerativeBackend`].
//!
//! Talks to `models/{model}:generateContent` with blocking requests: the
//! pipeline makes exactly one long-latency call per invocation, so there is
//! nothing to multiplex. The API key is read from the environment at call
//! time (variable name from config) and sent via the `x-goog-api-key`
//! header.
//!
//! ## Model mapping
//!
//! | Call | Model | Response |
//! |---|---|---|
//! | `generate_frame` | image model (`gemini-2.5-flash-image`) | inline image data |
//! | `generate_theme` | text model (`gemini-2.5-flash`) | JSON against a response schema |
//! | `ask_coach` | text model | plain text |

use super::backend::{
    CoachRequest, FrameRequest, GeneratedImage, GenerativeBackend, ServiceError, ThemeRequest,
};
use crate::config::ServiceConfig;
use crate::prompt;
use crate::types::Theme;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Mime type of every composite this crate sends.
const COMPOSITE_MIME: &str = "image/jpeg";

/// Fallback mime type when the service omits one on a returned image.
const DEFAULT_IMAGE_MIME: &str = "image/png";

/// How much of an error body to quote back to the user.
const ERROR_BODY_LIMIT: usize = 300;

pub struct GeminiClient {
    api_base: String,
    image_model: String,
    text_model: String,
    api_key_env: String,
    http: reqwest::blocking::Client,
}

impl GeminiClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            image_model: config.image_model.clone(),
            text_model: config.text_model.clone(),
            api_key_env: config.api_key_env.clone(),
            http,
        })
    }

    fn api_key(&self) -> Result<String, ServiceError> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ServiceError::MissingApiKey(self.api_key_env.clone()))
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.api_base)
    }

    /// POST a generateContent payload and deserialize the envelope.
    fn post(
        &self,
        model: &str,
        payload: &serde_json::Value,
    ) -> Result<GenerateContentResponse, ServiceError> {
        let api_key = self.api_key()?;
        let endpoint = self.endpoint(model);
        log::debug!("POST {endpoint}");

        let response = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", api_key)
            .json(payload)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            log::warn!("generation call to {model} failed with {status}");
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message: truncate(&body, ERROR_BODY_LIMIT),
            });
        }

        response
            .json::<GenerateContentResponse>()
            .map_err(|e| ServiceError::MalformedResponse(e.to_string()))
    }
}

impl GenerativeBackend for GeminiClient {
    fn generate_frame(&self, request: &FrameRequest) -> Result<GeneratedImage, ServiceError> {
        log::info!(
            "requesting frame generation ({} prompt chars, {} composite bytes)",
            request.prompt.len(),
            request.image_jpeg.len()
        );

        let payload = json!({
            "contents": [{
                "parts": [
                    {
                        "inlineData": {
                            "mimeType": COMPOSITE_MIME,
                            "data": BASE64.encode(&request.image_jpeg),
                        }
                    },
                    { "text": request.prompt },
                ]
            }],
            "generationConfig": {
                "temperature": request.sampling.temperature,
                "topP": request.sampling.top_p,
                "topK": request.sampling.top_k,
                "responseModalities": ["IMAGE"],
            },
        });

        let response = self.post(&self.image_model, &payload)?;
        let image = response.first_inline_image()?.ok_or(ServiceError::NoImage)?;
        log::info!("frame generated ({} bytes, {})", image.bytes.len(), image.mime_type);
        Ok(image)
    }

    fn generate_theme(&self, request: &ThemeRequest) -> Result<Theme, ServiceError> {
        log::info!("requesting theme generation");

        let payload = json!({
            "contents": [{ "parts": [{ "text": request.description }] }],
            "systemInstruction": { "parts": [{ "text": request.system_instruction }] },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": theme_response_schema(),
            },
        });

        let response = self.post(&self.text_model, &payload)?;
        let text = response
            .joined_text()
            .ok_or_else(|| ServiceError::MalformedResponse("response contained no text".into()))?;

        // The schema should prevent fenced output, but models fence anyway
        // often enough to parse for it.
        let body = strip_json_fences(&text);
        serde_json::from_str(body).map_err(|e| {
            ServiceError::MalformedResponse(format!("theme JSON did not parse: {e}"))
        })
    }

    fn ask_coach(&self, request: &CoachRequest) -> Result<String, ServiceError> {
        log::info!("asking the coach ({:?} tone)", request.tone);

        let mut parts = Vec::new();
        if let Some(image) = &request.image_jpeg {
            parts.push(json!({
                "inlineData": {
                    "mimeType": COMPOSITE_MIME,
                    "data": BASE64.encode(image),
                }
            }));
        }
        parts.push(json!({ "text": prompt::coach_query(request.tone, &request.question) }));

        let payload = json!({
            "contents": [{ "parts": parts }],
            "systemInstruction": {
                "parts": [{ "text": prompt::coach_system_instruction(&request.app_config) }]
            },
        });

        let response = self.post(&self.text_model, &payload)?;
        response
            .joined_text()
            .ok_or_else(|| ServiceError::MalformedResponse("response contained no text".into()))
    }
}

/// Response schema handed to the text model so theme generation comes back
/// as one well-formed JSON object.
fn theme_response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "description": "A single theme object for the application's frame generation feature.",
        "properties": {
            "id": {
                "type": "STRING",
                "description": "A unique, URL-friendly ID for the theme (e.g., 'vintage-roses').",
            },
            "name": {
                "type": "STRING",
                "description": "A short, catchy name for the theme (e.g., 'Vintage Roses').",
            },
            "description": {
                "type": "STRING",
                "description": "A brief, one-sentence description of the theme.",
            },
            "iconName": {
                "type": "STRING",
                "description": format!(
                    "The name of an icon for the theme. Choose a valid name from: {}.",
                    crate::themes::known_icons().join(", ")
                ),
            },
            "prompt": {
                "type": "STRING",
                "description": "A detailed prompt for an AI image generator to create a frame in this theme's style. Ensure elements subtly extend inward, partially overlapping the very edges of the central image.",
            },
        },
        "required": ["id", "name", "description", "iconName", "prompt"],
    })
}

/// Strip a ```json ... ``` (or bare ```) fence if the model wrapped its
/// answer in one.
fn strip_json_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

fn truncate(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &text[..end])
}

// ============================================================================
// Wire envelope
// ============================================================================

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    inline_data: Option<InlineData>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: String,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
    }

    /// First inline image across all candidates, base64-decoded.
    fn first_inline_image(&self) -> Result<Option<GeneratedImage>, ServiceError> {
        for part in self.parts() {
            let Some(inline) = &part.inline_data else {
                continue;
            };
            if inline.data.is_empty() {
                continue;
            }
            let bytes = BASE64.decode(inline.data.as_bytes()).map_err(|e| {
                ServiceError::MalformedResponse(format!("image base64 did not decode: {e}"))
            })?;
            return Ok(Some(GeneratedImage {
                bytes,
                mime_type: inline
                    .mime_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string()),
            }));
        }
        Ok(None)
    }

    /// All text parts concatenated, `None` when there are none.
    fn joined_text(&self) -> Option<String> {
        let mut out = String::new();
        for part in self.parts() {
            if let Some(text) = &part.text {
                out.push_str(text);
            }
        }
        if out.is_empty() { None } else { Some(out) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn extracts_inline_image_from_response() {
        let encoded = BASE64.encode(b"fake png bytes");
        let response = parse(&format!(
            r#"{{"candidates":[{{"content":{{"parts":[
                {{"text":"Here is your frame."}},
                {{"inlineData":{{"mimeType":"image/png","data":"{encoded}"}}}}
            ]}}}}]}}"#
        ));

        let image = response.first_inline_image().unwrap().unwrap();
        assert_eq!(image.bytes, b"fake png bytes");
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn missing_inline_image_yields_none() {
        let response = parse(r#"{"candidates":[{"content":{"parts":[{"text":"sorry"}]}}]}"#);
        assert!(response.first_inline_image().unwrap().is_none());
    }

    #[test]
    fn empty_candidates_yield_none() {
        let response = parse(r#"{"candidates":[]}"#);
        assert!(response.first_inline_image().unwrap().is_none());
        assert!(response.joined_text().is_none());
    }

    #[test]
    fn missing_mime_type_defaults_to_png() {
        let encoded = BASE64.encode(b"bytes");
        let response = parse(&format!(
            r#"{{"candidates":[{{"content":{{"parts":[
                {{"inlineData":{{"data":"{encoded}"}}}}
            ]}}}}]}}"#
        ));
        let image = response.first_inline_image().unwrap().unwrap();
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn joins_text_parts_across_candidates() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello, "},{"text":"framer."}]}}]}"#,
        );
        assert_eq!(response.joined_text().unwrap(), "Hello, framer.");
    }

    #[test]
    fn strips_json_fences() {
        assert_eq!(strip_json_fences("{\"id\":\"x\"}"), "{\"id\":\"x\"}");
        assert_eq!(strip_json_fences("```json\n{\"id\":\"x\"}\n```"), "{\"id\":\"x\"}");
        assert_eq!(strip_json_fences("```\n{\"id\":\"x\"}\n```"), "{\"id\":\"x\"}");
        assert_eq!(strip_json_fences("  {\"id\":\"x\"}  "), "{\"id\":\"x\"}");
    }

    #[test]
    fn fenced_theme_json_parses() {
        let text = "```json\n{\"id\":\"sea-glass\",\"name\":\"Sea Glass\",\"description\":\"Frosted coastal glass.\",\"iconName\":\"Ship\",\"prompt\":\"frosted sea glass border\"}\n```";
        let theme: Theme = serde_json::from_str(strip_json_fences(text)).unwrap();
        assert_eq!(theme.id, "sea-glass");
        assert_eq!(theme.icon_name, "Ship");
    }

    #[test]
    fn theme_schema_lists_required_fields() {
        let schema = theme_response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            required,
            vec!["id", "name", "description", "iconName", "prompt"]
        );
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 300), "short");
        let long = "é".repeat(200);
        let cut = truncate(&long, 301);
        assert!(cut.ends_with('…'));
        assert!(cut.len() <= 305);
    }
}
