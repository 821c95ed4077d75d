//! The built-in theme set and the icon-name registry.
//!
//! Icons are a presentation concern: a theme carries a symbolic icon *name*,
//! and whatever renders the theme picker maps that name to a glyph. This
//! module only answers "is this a name the presentation layer knows?" so
//! generated themes can be validated before they reach a picker.

use crate::types::Theme;

/// Icon names the presentation layer can resolve. Matches the set offered to
/// the theme-generation model, so validated themes never reference a glyph
/// that cannot be drawn.
const KNOWN_ICONS: &[&str] = &[
    "Anchor", "Award", "Bike", "BookOpen", "Briefcase", "Brush", "Camera",
    "Castle", "Cat", "Cherry", "Cloud", "Code", "Compass", "Cpu", "Crown",
    "Diamond", "Feather", "Flag", "Flame", "Flower", "Gamepad2", "Gem",
    "Ghost", "Gift", "Globe", "Grape", "Heart", "Info", "KeyRound", "Leaf",
    "Lightbulb", "Map", "Medal", "Moon", "Mountain", "Music", "Palette",
    "Plane", "Puzzle", "Rocket", "Shield", "Ship", "Sparkles", "Star", "Sun",
    "Swords", "TreePine", "Trophy", "Umbrella", "Wand2", "Watch", "Wind",
    "Wrench",
];

/// Whether the presentation layer can resolve this icon name.
pub fn is_known_icon(name: &str) -> bool {
    KNOWN_ICONS.contains(&name)
}

/// All resolvable icon names, sorted.
pub fn known_icons() -> &'static [&'static str] {
    KNOWN_ICONS
}

/// The stock themes a fresh session starts with.
pub fn default_themes() -> Vec<Theme> {
    vec![
        Theme {
            id: "classic-elegance".into(),
            name: "Classic Elegance".into(),
            description: "An ornate and sophisticated golden frame.".into(),
            icon_name: "Medal".into(),
            prompt: "'Classic Elegance'. Create a sophisticated, ornate frame with \
                     intricate baroque details and a polished gold finish. The frame's \
                     thickness must be uniform and symmetrical on all four sides. AVOID \
                     an overly thick or bulky design; the frame should complement, not \
                     overpower, the central photo."
                .into(),
        },
        Theme {
            id: "modern-lines".into(),
            name: "Modern Lines".into(),
            description: "A clean, minimalist frame with sharp geometry.".into(),
            icon_name: "Wrench".into(),
            prompt: "'Modern Lines'. Generate a sleek, minimalist frame composed of \
                     clean, sharp geometric lines and a monochrome color palette (matte \
                     black, brushed metal). The design must be perfectly symmetrical. \
                     AVOID any organic, curved, or ornate elements."
                .into(),
        },
        Theme {
            id: "cosmic-watercolor".into(),
            name: "Cosmic Watercolor".into(),
            description: "A vibrant, abstract wash of cosmic colors.".into(),
            icon_name: "Wand2".into(),
            prompt: "'Cosmic Watercolor'. Create a vibrant, abstract frame that looks \
                     like a watercolor galaxy (deep blues, purples, pinks, with white \
                     ink splatters for stars). The frame should have soft, blended edges \
                     that seamlessly transition into the central photo area. AVOID hard, \
                     geometric borders."
                .into(),
        },
    ]
}

/// Look up a theme by slug in a session's theme list.
pub fn find_theme<'a>(themes: &'a [Theme], id: &str) -> Option<&'a Theme> {
    themes.iter().find(|t| t.id == id)
}
