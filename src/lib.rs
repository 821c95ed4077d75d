//! # Frame Studio
//!
//! AI photo framing as a pipeline: crop a photo, composite it onto a larger
//! blank canvas, and ask a generative image model to paint a decorative
//! frame into the blank border — leaving the photo itself untouched.
//!
//! # Architecture: One Linear Pipeline
//!
//! Every framing request runs the same dependency-ordered sequence:
//!
//! ```text
//! 1. Crop     display-space rect  →  native-resolution extract
//! 2. Margin   crop                →  centered square on a sentinel canvas
//! 3. Compose  rule + base + theme + guardrails  →  one prompt string
//! 4. Generate composite + prompt  →  finished frame (external model)
//! ```
//!
//! Steps 1-3 are deterministic and run entirely locally; step 4 is the only
//! long-latency operation and runs exactly once per invocation — no retry,
//! no cache, no partial results. A failed invocation leaves nothing behind;
//! retrying redoes compositing and prompt assembly from scratch.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`compositing`] | Pure geometry calculations + crop/margin/encode pixel operations |
//! | [`prompt`] | Layered prompt assembly: fixed preservation rule, base prompt, theme, guardrails |
//! | [`service`] | The generation-service seam: backend trait + Gemini REST client |
//! | [`pipeline`] | The crop → pad → compose → generate sequence as one function |
//! | [`themes`] | Built-in theme set and the icon-name registry |
//! | [`config`] | `frame-studio.toml` loading, validation, and stock config generation |
//! | [`types`] | Shared serialized types (`Theme`, `SamplingParams`, `Tone`) |
//! | [`output`] | CLI output formatting — pure `format_*` functions, `print_*` wrappers |
//!
//! # Design Decisions
//!
//! ## The Canvas Is a Contract
//!
//! The generator is an inpainting-style model: it needs a fixed canvas size
//! and an unambiguous blank region to know where to paint. The composite is
//! always exactly 1024×1024 with the photo resampled into a centered
//! 768×768 square and a uniform 128px white border. Those constants live in
//! `[canvas]` config because they belong to the model integration, not to
//! the code — a different generator means a different canvas profile.
//!
//! ## Display vs. Natural Coordinates
//!
//! Crop rectangles arrive in the coordinate space of the image *as the
//! cropping UI rendered it*, which is rarely its intrinsic pixel size. All
//! crop math scales through the natural/display ratio first and copies
//! pixels at native resolution, so a crop never inherits the display's
//! downscaling.
//!
//! ## The Preservation Rule Is Not Configurable
//!
//! The first prompt segment — do not touch the central photo — is a
//! hard-coded constant deliberately excluded from the config surface. It is
//! the single guarantee the user gets about their photo; every other prompt
//! layer (base, theme, guardrails) is editable.
//!
//! ## One Call, No Retries
//!
//! The service client makes exactly one blocking request per invocation and
//! reports failure distinctly: transport errors, HTTP status errors, and
//! "succeeded but returned no image" are separate cases, because the user
//! recovers differently from each (check the network, check the key/quota,
//! try a different prompt).

pub mod compositing;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod prompt;
pub mod service;
pub mod themes;
pub mod types;
