//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! Display follows a two-level pattern: a header line carrying the entity's
//! identity (index + name), then indented context lines.

use crate::pipeline::FramedPhoto;
use crate::types::Theme;
use std::path::Path;

const INDENT: &str = "    ";

/// Theme list: one header per theme, description and icon as context.
pub fn format_theme_list(themes: &[Theme]) -> Vec<String> {
    let mut lines = vec!["Themes".to_string()];
    for (index, theme) in themes.iter().enumerate() {
        lines.push(format!("{:03} {} ({})", index + 1, theme.name, theme.id));
        lines.push(format!("{INDENT}{}", theme.description));
        lines.push(format!("{INDENT}Icon: {}", theme.icon_name));
    }
    lines
}

/// Full detail for one theme, prompt included.
pub fn format_theme_detail(theme: &Theme) -> Vec<String> {
    vec![
        format!("{} ({})", theme.name, theme.id),
        format!("{INDENT}{}", theme.description),
        format!("{INDENT}Icon: {}", theme.icon_name),
        format!("{INDENT}Prompt: {}", theme.prompt),
    ]
}

/// Summary after `prepare` writes a composite.
pub fn format_prepare_result(output: &Path, composite_bytes: usize, canvas_size: u32) -> Vec<String> {
    vec![
        format!("Composite → {}", output.display()),
        format!("{INDENT}{canvas_size}x{canvas_size}, {} bytes", composite_bytes),
    ]
}

/// Summary after a full `frame` run.
pub fn format_frame_result(framed: &FramedPhoto, output: &Path) -> Vec<String> {
    vec![
        format!("Frame → {}", output.display()),
        format!(
            "{INDENT}{} bytes ({})",
            framed.image.bytes.len(),
            framed.image.mime_type
        ),
        format!("{INDENT}Composite sent: {} bytes", framed.composite_jpeg.len()),
        format!("{INDENT}Prompt sent: {} chars", framed.prompt.len()),
    ]
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
