//! Prompt assembly for every model call the studio makes.
//!
//! The frame prompt is layered in a fixed order: a non-negotiable
//! photo-preservation rule, the (user-editable) base prompt, the selected
//! theme's style sentence, and an optional labeled guardrails block.
//! Composition is total and deterministic: no timestamps, no randomness,
//! identical inputs produce byte-identical output. Nothing downstream ever
//! re-parses the result; it is only sent.

use crate::types::{Theme, Tone};

/// The one guarantee the user gets: the generator must not touch the photo
/// itself. Always the first segment of the final prompt, and never editable.
pub const PRESERVE_PHOTO_RULE: &str = "CRITICAL RULES:\n\
1.  **Preserve the Photo:** Do NOT modify, alter, or draw over the existing central photo. The original photo must remain perfectly untouched.";

/// Default base prompt carrying the layout and fill instructions. Editable
/// per session (`[prompt] base_prompt` in config); it is phrased to lead
/// grammatically into the theme sentence, which is why the composer joins
/// them with a single space rather than a blank line.
pub const DEFAULT_BASE_PROMPT: &str = "You are an AI digital artist specializing in creating beautiful, bespoke photo frames.\n\
\n\
I have provided a composite image with a central photo placed on a larger canvas. Your task is to design and draw a creative frame in the blank white area that surrounds the central photo.\n\
\n\
The key is to create a frame that looks intentionally designed **for** the photo. The elements of the frame should gracefully touch and interact with the edges of the central photo, rather than looking like they are cut off by it. Imagine you are creating a real, physical frame that goes around the picture.\n\
\n\
2.  **Seamless Integration:** The frame's design elements must not be abruptly cut off at the photo's edge. The design should naturally conclude or curve away as it meets the boundary of the photograph.\n\
3.  **Complete the Frame:** Fill the entire blank white area from the edge of the photo to the outer edge of the canvas. Do not leave any empty margins.\n\
4.  **Maintain Dimensions:** The final generated image you return must be a perfect 1024x1024 square.\n\
\n\
The theme for the frame is:";

/// System instruction for generating a whole theme from a user description.
/// The model must answer with a single JSON object matching the theme schema.
pub const THEME_GENERATION_SYSTEM_INSTRUCTION: &str = "You are an AI assistant that creates a theme for a photo framing application. The user will describe a style. Your task is to generate a single, complete theme configuration based on their description. You must respond with a valid JSON object that adheres to the provided schema. The theme should be creative and consistent with the user's request. The 'prompt' you generate should be detailed and guide an image AI to create a beautiful frame. Ensure elements subtly extend inward, partially overlapping the very edges of the central image.";

/// Assemble the final frame-generation prompt.
///
/// Segment order is fixed and never conditional: preservation rule, blank
/// line, base prompt, space, theme prompt, then — only when `guardrails`
/// trims non-empty — a blank line and the labeled guardrails block.
pub fn compose_frame_prompt(theme: &Theme, base_prompt: &str, guardrails: Option<&str>) -> String {
    let mut prompt = format!("{PRESERVE_PHOTO_RULE}\n\n{base_prompt} {}", theme.prompt);

    if let Some(guardrails) = guardrails {
        let trimmed = guardrails.trim();
        if !trimmed.is_empty() {
            prompt.push_str("\n\nADDITIONAL USER GUARDRAILS:\n");
            prompt.push_str(trimmed);
        }
    }

    prompt
}

/// Per-tone answering instruction for the coach.
pub fn tone_instruction(tone: Tone) -> &'static str {
    match tone {
        Tone::Simple => {
            "Explain your answer in simple, non-technical terms, using an analogy if possible. Be friendly and encouraging."
        }
        Tone::Standard => "Provide a clear and concise explanation.",
        Tone::Technical => {
            "Provide a detailed, technical explanation suitable for a developer. You can mention underlying concepts and technologies."
        }
    }
}

/// System instruction for the coach assistant, embedding the app's live
/// configuration so answers reflect the session's actual settings.
pub fn coach_system_instruction(app_config: &serde_json::Value) -> String {
    let config_json =
        serde_json::to_string_pretty(app_config).unwrap_or_else(|_| "{}".to_string());
    format!(
        "You are \"Frame Coach\", a helpful and witty AI assistant embedded within a web application called 'Frame Studio'. Your personality is that of a creative art coach and prompt engineering expert.\n\
Your primary roles are:\n\
1.  **App Expert:** Answer user questions about this app ('Frame Studio'), its settings, features, and the AI/design concepts it demonstrates. The app allows users to upload a photo, generate a creative frame around it using AI, and customize the entire app's theme.\n\
2.  **Prompting Guru:** Help users write better, more effective prompts to generate beautiful and lush frame designs. If a user asks for help with a prompt, guide them with suggestions, ask clarifying questions about their desired style, and help them refine their ideas into a detailed prompt that the frame generation AI can understand.\n\
\n\
Do not answer questions unrelated to this application or prompt engineering for it. If asked an off-topic question, politely steer the conversation back to the app.\n\
\n\
Here is the app's current live configuration for your context:\n\
{config_json}"
    )
}

/// Wrap a user question in its tone instruction for the coach call.
pub fn coach_query(tone: Tone, question: &str) -> String {
    format!("{}\n\nUser Question: \"{question}\"", tone_instruction(tone))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme_with_prompt(prompt: &str) -> Theme {
        Theme {
            id: "test-theme".into(),
            name: "Test Theme".into(),
            description: "A theme for tests.".into(),
            icon_name: "Star".into(),
            prompt: prompt.into(),
        }
    }

    #[test]
    fn preservation_rule_always_comes_first() {
        let theme = theme_with_prompt("Gothic arches");
        let prompt = compose_frame_prompt(&theme, "Fill the border.", None);
        assert!(prompt.starts_with(PRESERVE_PHOTO_RULE));

        let rule_pos = prompt.find("CRITICAL RULES").unwrap();
        let base_pos = prompt.find("Fill the border.").unwrap();
        assert!(rule_pos < base_pos);
    }

    #[test]
    fn theme_prompt_joins_base_on_same_line() {
        let theme = theme_with_prompt("Gothic arches");
        let prompt = compose_frame_prompt(&theme, "Fill the border.", None);
        assert!(prompt.contains("Fill the border. Gothic arches"));
    }

    #[test]
    fn composition_is_idempotent() {
        let theme = theme_with_prompt("Art deco fans");
        let a = compose_frame_prompt(&theme, DEFAULT_BASE_PROMPT, Some("no text"));
        let b = compose_frame_prompt(&theme, DEFAULT_BASE_PROMPT, Some("no text"));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_guardrails_are_omitted() {
        let theme = theme_with_prompt("Gothic arches");
        let none = compose_frame_prompt(&theme, "Fill the border.", None);
        let empty = compose_frame_prompt(&theme, "Fill the border.", Some(""));
        let blank = compose_frame_prompt(&theme, "Fill the border.", Some("   "));

        assert_eq!(none, empty);
        assert_eq!(none, blank);
        assert!(!none.contains("ADDITIONAL USER GUARDRAILS"));
    }

    #[test]
    fn guardrails_are_trimmed_and_labeled() {
        let theme = theme_with_prompt("Gothic arches");
        let prompt = compose_frame_prompt(&theme, "Fill the border.", Some("  no blur \n"));
        assert!(prompt.ends_with("ADDITIONAL USER GUARDRAILS:\nno blur"));
    }

    #[test]
    fn full_layering_scenario() {
        let theme = theme_with_prompt("Gothic arches");
        let prompt = compose_frame_prompt(&theme, "Fill the border.", Some("keep it dark"));

        let rule_pos = prompt.find("CRITICAL RULES").unwrap();
        let base_pos = prompt.find("Fill the border. Gothic arches").unwrap();
        let guard_pos = prompt.find("ADDITIONAL USER GUARDRAILS:\nkeep it dark").unwrap();
        assert!(rule_pos < base_pos);
        assert!(base_pos < guard_pos);
    }

    #[test]
    fn empty_theme_prompt_still_composes() {
        // The composer is total; guarding against empty theme prompts is the
        // caller's job.
        let theme = theme_with_prompt("");
        let prompt = compose_frame_prompt(&theme, "Fill the border.", None);
        assert!(prompt.ends_with("Fill the border. "));
    }

    #[test]
    fn coach_query_carries_tone_and_question() {
        let query = coach_query(Tone::Simple, "What does top-k do?");
        assert!(query.starts_with(tone_instruction(Tone::Simple)));
        assert!(query.ends_with("User Question: \"What does top-k do?\""));
    }

    #[test]
    fn coach_instruction_embeds_app_config() {
        let config = serde_json::json!({ "themes": ["classic-elegance"] });
        let instruction = coach_system_instruction(&config);
        assert!(instruction.contains("Frame Coach"));
        assert!(instruction.contains("classic-elegance"));
    }
}
