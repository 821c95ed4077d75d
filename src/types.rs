//! Shared types used across the pipeline and the service boundary.
//!
//! These types are serialized on the service wire (camelCase, to match the
//! generation API's theme schema) and in `frame-studio.toml`, so field names
//! here are a compatibility surface.

use serde::{Deserialize, Serialize};

/// A named, reusable style descriptor driving the generated frame's look.
///
/// Themes live in session memory only: they start from the built-in set
/// ([`crate::themes::default_themes`]), can be replaced wholesale by a
/// generation call, or edited field by field. Nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Unique, URL-friendly slug (e.g. `vintage-roses`).
    pub id: String,
    /// Short display name (e.g. "Vintage Roses").
    pub name: String,
    /// One-sentence description shown in pickers.
    pub description: String,
    /// Symbolic icon reference, resolved to a glyph outside this crate.
    /// See [`crate::themes::is_known_icon`].
    pub icon_name: String,
    /// Free-text style description appended to the base prompt.
    pub prompt: String,
}

impl Theme {
    /// A valid slug is non-empty lowercase ASCII alphanumerics and dashes.
    pub fn has_valid_slug(&self) -> bool {
        !self.id.is_empty()
            && self
                .id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }
}

/// Numeric sampling controls passed opaquely to the generation model.
///
/// Ranges mirror what the settings sliders allow: temperature and top-p in
/// [0, 1], top-k an integer in [1, 100]. Values are clamped on construction;
/// beyond that they are not interpreted locally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingParams {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
}

impl SamplingParams {
    pub fn new(temperature: f64, top_p: f64, top_k: u32) -> Self {
        Self {
            temperature: temperature.clamp(0.0, 1.0),
            top_p: top_p.clamp(0.0, 1.0),
            top_k: top_k.clamp(1, 100),
        }
    }
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            top_p: 0.8,
            top_k: 40,
        }
    }
}

/// Voice the coach assistant answers in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Non-technical, with an analogy where possible.
    Simple,
    /// Clear and concise.
    #[default]
    Standard,
    /// Developer-level detail.
    Technical,
}
