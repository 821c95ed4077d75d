//! Studio configuration module.
//!
//! Handles loading and validating `frame-studio.toml`. Configuration is
//! sparse: stock defaults cover everything, and a user config file only
//! overrides the values it names. Unknown keys are rejected to catch typos
//! early.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [canvas]
//! size = 1024            # Outer canvas side in pixels
//! inner_size = 768       # Centered photo square side in pixels
//! fill = "#ffffff"       # Sentinel fill color the model paints over
//! jpeg_quality = 90      # Composite encoding quality (1-100)
//!
//! [sampling]
//! temperature = 0.8      # 0.0 - 1.0
//! top_p = 0.8            # 0.0 - 1.0
//! top_k = 40             # 1 - 100
//!
//! [prompt]
//! # base_prompt = "..."  # Override the built-in base prompt
//! # guardrails = "..."   # Standing guardrails appended to every frame prompt
//!
//! [service]
//! api_base = "https://generativelanguage.googleapis.com/v1beta"
//! image_model = "gemini-2.5-flash-image"
//! text_model = "gemini-2.5-flash"
//! api_key_env = "GEMINI_API_KEY"
//! timeout_secs = 120
//! ```
//!
//! The canvas constants are a contract with the integrated generator; change
//! them only for a deployment profile that targets a different model.

use crate::compositing::{CanvasSpec, Quality};
use crate::prompt::DEFAULT_BASE_PROMPT;
use crate::types::SamplingParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Studio configuration loaded from `frame-studio.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudioConfig {
    /// Padded-canvas geometry and composite encoding.
    pub canvas: CanvasConfig,
    /// Default sampling controls for frame generation.
    pub sampling: SamplingConfig,
    /// Base prompt override and standing guardrails.
    pub prompt: PromptConfig,
    /// Generation service endpoint and models.
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    pub size: u32,
    pub inner_size: u32,
    /// `#rrggbb` hex color.
    pub fill: String,
    pub jpeg_quality: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            size: 1024,
            inner_size: 768,
            fill: "#ffffff".to_string(),
            jpeg_quality: 90,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplingConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        let params = SamplingParams::default();
        Self {
            temperature: params.temperature,
            top_p: params.top_p,
            top_k: params.top_k,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PromptConfig {
    /// Replaces the built-in base prompt when set.
    pub base_prompt: Option<String>,
    /// Standing guardrails appended to every frame prompt (CLI flag wins).
    pub guardrails: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub api_base: String,
    pub image_model: String,
    pub text_model: String,
    /// Name of the environment variable holding the API key. The key itself
    /// never lives in config files.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            text_model: "gemini-2.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

impl StudioConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas.size == 0 {
            return Err(ConfigError::Validation("canvas.size must be non-zero".into()));
        }
        if self.canvas.inner_size == 0 || self.canvas.inner_size >= self.canvas.size {
            return Err(ConfigError::Validation(
                "canvas.inner_size must be non-zero and smaller than canvas.size".into(),
            ));
        }
        if (self.canvas.size - self.canvas.inner_size) % 2 != 0 {
            return Err(ConfigError::Validation(
                "canvas.size minus canvas.inner_size must be even so the margin is uniform".into(),
            ));
        }
        if parse_hex_color(&self.canvas.fill).is_none() {
            return Err(ConfigError::Validation(format!(
                "canvas.fill must be a #rrggbb color, got {:?}",
                self.canvas.fill
            )));
        }
        if self.canvas.jpeg_quality == 0 || self.canvas.jpeg_quality > 100 {
            return Err(ConfigError::Validation(
                "canvas.jpeg_quality must be 1-100".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.sampling.temperature) {
            return Err(ConfigError::Validation(
                "sampling.temperature must be 0.0-1.0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.sampling.top_p) {
            return Err(ConfigError::Validation("sampling.top_p must be 0.0-1.0".into()));
        }
        if self.sampling.top_k == 0 || self.sampling.top_k > 100 {
            return Err(ConfigError::Validation("sampling.top_k must be 1-100".into()));
        }
        if self.service.api_base.is_empty() {
            return Err(ConfigError::Validation("service.api_base must be set".into()));
        }
        if self.service.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "service.timeout_secs must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// The canvas contract as the compositor consumes it.
    pub fn canvas_spec(&self) -> CanvasSpec {
        CanvasSpec {
            size: self.canvas.size,
            inner_size: self.canvas.inner_size,
            // validate() guarantees the color parses
            fill: parse_hex_color(&self.canvas.fill).unwrap_or([255, 255, 255]),
        }
    }

    pub fn jpeg_quality(&self) -> Quality {
        Quality::new(self.canvas.jpeg_quality)
    }

    pub fn sampling_params(&self) -> SamplingParams {
        SamplingParams::new(
            self.sampling.temperature,
            self.sampling.top_p,
            self.sampling.top_k,
        )
    }

    /// Effective base prompt: the session override or the built-in default.
    pub fn base_prompt(&self) -> &str {
        self.prompt.base_prompt.as_deref().unwrap_or(DEFAULT_BASE_PROMPT)
    }
}

/// Load and validate a config file.
pub fn load(path: &Path) -> Result<StudioConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: StudioConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load the config file if it exists, otherwise stock defaults.
pub fn load_optional(path: &Path) -> Result<StudioConfig, ConfigError> {
    if path.exists() {
        load(path)
    } else {
        Ok(StudioConfig::default())
    }
}

/// Parse a `#rrggbb` hex color into RGB bytes.
pub fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some([
        u8::from_str_radix(&hex[0..2], 16).ok()?,
        u8::from_str_radix(&hex[2..4], 16).ok()?,
        u8::from_str_radix(&hex[4..6], 16).ok()?,
    ])
}

/// A fully documented stock config, printed by `frame-studio gen-config`.
pub fn stock_config_toml() -> String {
    let defaults = ServiceConfig::default();
    format!(
        r##"# frame-studio configuration
# All options are optional - the values below are the stock defaults.

[canvas]
# The padded-canvas contract with the generation model: the photo sits in a
# centered inner square, and the border is filled with a solid sentinel
# color the model is instructed to paint over. Change only for a deployment
# profile that targets a different model resolution.
size = 1024
inner_size = 768
fill = "#ffffff"
# Composite encoding quality (1-100).
jpeg_quality = 90

[sampling]
# Defaults for frame generation; each can be overridden per invocation.
temperature = 0.8
top_p = 0.8
top_k = 40

[prompt]
# Uncomment to replace the built-in base prompt. The fixed photo-preservation
# rule is always prepended and cannot be changed here.
# base_prompt = """..."""
# Standing guardrails appended to every frame prompt.
# guardrails = "no text, no watermarks"

[service]
api_base = "{api_base}"
image_model = "{image_model}"
text_model = "{text_model}"
# Environment variable the API key is read from (never stored in config).
api_key_env = "{api_key_env}"
timeout_secs = {timeout_secs}
"##,
        api_base = defaults.api_base,
        image_model = defaults.image_model,
        text_model = defaults.text_model,
        api_key_env = defaults.api_key_env,
        timeout_secs = defaults.timeout_secs,
    )
}
