use clap::{Parser, Subcommand, ValueEnum};
use frame_studio::compositing::{CropRect, Dimensions};
use frame_studio::pipeline::{self, FrameJob};
use frame_studio::service::{CoachRequest, GeminiClient, GenerativeBackend, ThemeRequest};
use frame_studio::types::{SamplingParams, Theme, Tone};
use frame_studio::{config, output, prompt, themes};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "frame-studio")]
#[command(about = "AI photo framing: crop, composite, and prompt a model to paint the frame")]
#[command(long_about = "\
AI photo framing: crop, composite, and prompt a model to paint the frame

The pipeline is three deterministic steps plus one generation call:

  1. Crop      display-space rectangle → native-resolution extract
  2. Margin    crop → centered 768x768 square on a white 1024x1024 canvas
  3. Compose   preservation rule + base prompt + theme + guardrails
  4. Generate  composite + prompt → the model paints the blank border

Crop rectangles are given as X,Y,WxH in the coordinates of the image as the
cropping UI displayed it; pass --display WxH when that differs from the
image's intrinsic pixel size.

The generation API key is read from the environment (GEMINI_API_KEY by
default; see 'frame-studio gen-config' for the [service] options).")]
#[command(version = version_string())]
struct Cli {
    /// Config file
    #[arg(long, default_value = "frame-studio.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

/// Shared flags for commands that crop a photo.
#[derive(clap::Args, Clone)]
struct CropArgs {
    /// Crop rectangle as X,Y,WxH in display coordinates (e.g. 10,10,400x400)
    #[arg(long, value_parser = parse_crop)]
    crop: CropRect,

    /// Size the cropping UI displayed the photo at, as WxH (defaults to the
    /// photo's intrinsic size)
    #[arg(long, value_parser = parse_dimensions)]
    display: Option<Dimensions>,
}

/// Shared flags for commands that compose a frame prompt.
#[derive(clap::Args, Clone)]
struct PromptArgs {
    /// Theme slug (see 'themes list')
    #[arg(long)]
    theme: String,

    /// Extra constraints appended as a labeled guardrails block
    #[arg(long)]
    guardrails: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Crop and pad a photo into the composite the generator expects
    Prepare {
        /// Photo file to frame
        photo: PathBuf,

        #[command(flatten)]
        crop: CropArgs,

        /// Output path (defaults to <photo>-composite.jpg)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the final prompt for a theme without calling the service
    Compose {
        #[command(flatten)]
        prompt: PromptArgs,
    },
    /// Run the full pipeline and write the generated frame
    Frame {
        /// Photo file to frame
        photo: PathBuf,

        #[command(flatten)]
        crop: CropArgs,

        #[command(flatten)]
        prompt: PromptArgs,

        /// Sampling temperature (0.0-1.0)
        #[arg(long)]
        temperature: Option<f64>,

        /// Nucleus sampling cutoff (0.0-1.0)
        #[arg(long)]
        top_p: Option<f64>,

        /// Top-k sampling (1-100)
        #[arg(long)]
        top_k: Option<u32>,

        /// Output path (defaults to <photo>-framed.<ext> per the returned type)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Inspect the built-in themes or generate a new one
    Themes {
        #[command(subcommand)]
        command: ThemesCommand,
    },
    /// Ask the coach about the app or about prompt writing
    Ask {
        /// The question
        question: String,

        /// Answer voice
        #[arg(long, value_enum, default_value_t = ToneArg::Standard)]
        tone: ToneArg,

        /// Optional photo to discuss
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Print a stock frame-studio.toml with all options documented
    GenConfig,
}

#[derive(Subcommand)]
enum ThemesCommand {
    /// List the built-in theme set
    List,
    /// Show one theme in full, prompt included
    Show { id: String },
    /// Have the text model generate a theme from a style description
    Generate { description: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ToneArg {
    Simple,
    Standard,
    Technical,
}

impl std::fmt::Display for ToneArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ToneArg::Simple => "simple",
            ToneArg::Standard => "standard",
            ToneArg::Technical => "technical",
        })
    }
}

impl From<ToneArg> for Tone {
    fn from(tone: ToneArg) -> Self {
        match tone {
            ToneArg::Simple => Tone::Simple,
            ToneArg::Standard => Tone::Standard,
            ToneArg::Technical => Tone::Technical,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let config = config::load_optional(&cli.config)?;

    match cli.command {
        Command::Prepare { photo, crop, output } => {
            let bytes = std::fs::read(&photo)?;
            let composite = pipeline::prepare_composite(
                &bytes,
                &crop.crop,
                crop.display,
                &config.canvas_spec(),
                config.jpeg_quality(),
            )?;
            let output = output.unwrap_or_else(|| derived_path(&photo, "composite", "jpg"));
            std::fs::write(&output, &composite)?;
            output::print_lines(&output::format_prepare_result(
                &output,
                composite.len(),
                config.canvas.size,
            ));
        }
        Command::Compose { prompt: prompt_args } => {
            let theme = lookup_theme(&prompt_args.theme)?;
            let guardrails = effective_guardrails(&prompt_args, &config);
            let final_prompt =
                prompt::compose_frame_prompt(&theme, config.base_prompt(), guardrails.as_deref());
            println!("{final_prompt}");
        }
        Command::Frame {
            photo,
            crop,
            prompt: prompt_args,
            temperature,
            top_p,
            top_k,
            output,
        } => {
            let theme = lookup_theme(&prompt_args.theme)?;
            if !pipeline::theme_is_usable(&theme) {
                return Err(format!("theme '{}' has an empty prompt", theme.id).into());
            }
            let guardrails = effective_guardrails(&prompt_args, &config);

            let defaults = config.sampling_params();
            let sampling = SamplingParams::new(
                temperature.unwrap_or(defaults.temperature),
                top_p.unwrap_or(defaults.top_p),
                top_k.unwrap_or(defaults.top_k),
            );

            let bytes = std::fs::read(&photo)?;
            let service = GeminiClient::new(&config.service)?;
            let framed = pipeline::frame_photo(
                &service,
                &FrameJob {
                    photo: &bytes,
                    crop: crop.crop,
                    display: crop.display,
                    theme: &theme,
                    base_prompt: config.base_prompt(),
                    guardrails: guardrails.as_deref(),
                    sampling,
                    canvas: config.canvas_spec(),
                    jpeg_quality: config.jpeg_quality(),
                },
            )?;

            let output = output.unwrap_or_else(|| {
                derived_path(&photo, "framed", extension_for_mime(&framed.image.mime_type))
            });
            std::fs::write(&output, &framed.image.bytes)?;
            output::print_lines(&output::format_frame_result(&framed, &output));
        }
        Command::Themes { command } => match command {
            ThemesCommand::List => {
                output::print_lines(&output::format_theme_list(&themes::default_themes()));
            }
            ThemesCommand::Show { id } => {
                let theme = lookup_theme(&id)?;
                output::print_lines(&output::format_theme_detail(&theme));
            }
            ThemesCommand::Generate { description } => {
                let service = GeminiClient::new(&config.service)?;
                let theme = service.generate_theme(&ThemeRequest {
                    description,
                    system_instruction: prompt::THEME_GENERATION_SYSTEM_INSTRUCTION.to_string(),
                })?;

                if !theme.has_valid_slug() {
                    eprintln!("warning: generated id {:?} is not a clean slug", theme.id);
                }
                if !themes::is_known_icon(&theme.icon_name) {
                    eprintln!(
                        "warning: icon {:?} is not in the icon registry",
                        theme.icon_name
                    );
                }

                output::print_lines(&output::format_theme_detail(&theme));
                println!();
                println!("{}", serde_json::to_string_pretty(&theme)?);
            }
        },
        Command::Ask { question, tone, image } => {
            let image_jpeg = match image {
                Some(path) => Some(reencode_as_jpeg(&path, &config)?),
                None => None,
            };
            let service = GeminiClient::new(&config.service)?;
            let answer = service.ask_coach(&CoachRequest {
                question,
                tone: tone.into(),
                app_config: app_config_context(&config),
                image_jpeg,
            })?;
            println!("{answer}");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Find a theme by slug in the built-in set.
fn lookup_theme(id: &str) -> Result<Theme, String> {
    let themes = themes::default_themes();
    themes::find_theme(&themes, id).cloned().ok_or_else(|| {
        let known: Vec<&str> = themes.iter().map(|t| t.id.as_str()).collect();
        format!("unknown theme '{}'; available: {}", id, known.join(", "))
    })
}

/// CLI guardrails win over standing config guardrails.
fn effective_guardrails(args: &PromptArgs, config: &config::StudioConfig) -> Option<String> {
    args.guardrails
        .clone()
        .or_else(|| config.prompt.guardrails.clone())
}

/// The session settings the coach gets to see, mirroring what the app would
/// show in its settings panel.
fn app_config_context(config: &config::StudioConfig) -> serde_json::Value {
    serde_json::json!({
        "themes": themes::default_themes(),
        "sampling": config.sampling_params(),
        "basePromptIsCustom": config.prompt.base_prompt.is_some(),
        "canvas": { "size": config.canvas.size, "innerSize": config.canvas.inner_size },
    })
}

/// Decode any supported photo and re-encode it as JPEG for an inline part.
fn reencode_as_jpeg(
    path: &Path,
    config: &config::StudioConfig,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    use frame_studio::compositing;
    let bytes = std::fs::read(path)?;
    let image = compositing::decode(&bytes)?.to_rgb8();
    Ok(compositing::encode_jpeg(&image, config.jpeg_quality())?)
}

/// `photo.jpg` + "framed"/"png" → `photo-framed.png`, beside the input.
fn derived_path(photo: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = photo
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "photo".to_string());
    photo.with_file_name(format!("{stem}-{suffix}.{extension}"))
}

fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    }
}

/// Parse `X,Y,WxH` (display coordinates, fractional allowed).
fn parse_crop(value: &str) -> Result<CropRect, String> {
    let parts: Vec<&str> = value.split(',').collect();
    let &[x, y, size] = parts.as_slice() else {
        return Err("expected X,Y,WxH (e.g. 10,10,400x400)".to_string());
    };
    let (width, height) = size
        .split_once('x')
        .ok_or_else(|| "expected WxH after the second comma (e.g. 400x400)".to_string())?;

    let parse = |label: &str, raw: &str| -> Result<f64, String> {
        raw.trim()
            .parse::<f64>()
            .map_err(|_| format!("{label} is not a number: {raw:?}"))
    };

    Ok(CropRect::new(
        parse("x", x)?,
        parse("y", y)?,
        parse("width", width)?,
        parse("height", height)?,
    ))
}

/// Parse `WxH` display dimensions.
fn parse_dimensions(value: &str) -> Result<Dimensions, String> {
    let (width, height) = value
        .split_once('x')
        .ok_or_else(|| "expected WxH (e.g. 800x600)".to_string())?;
    let parse = |label: &str, raw: &str| -> Result<u32, String> {
        raw.trim()
            .parse::<u32>()
            .ok()
            .filter(|&v| v > 0)
            .ok_or_else(|| format!("{label} must be a positive integer: {raw:?}"))
    };
    Ok(Dimensions::new(parse("width", width)?, parse("height", height)?))
}
