//! Reader theme: colors, typography and extra CSS for rendering.
//!
//! A theme serializes to a small JSON object so it can be stored as a
//! preference string. Only typography and the additional CSS are written;
//! colors always come back as the platform defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Font families CSS understands without quotes.
const GENERIC_FONT_FAMILIES: [&str; 11] = [
    "serif",
    "sans-serif",
    "monospace",
    "cursive",
    "fantasy",
    "system-ui",
    "ui-serif",
    "ui-sans-serif",
    "ui-monospace",
    "ui-rounded",
    "math",
];

/// A CSS color: either a system color that follows the user's platform
/// appearance, or an explicit RGBA value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// Body text.
    CanvasText,
    /// Secondary text.
    GrayText,
    /// Page background.
    Canvas,
    /// Button and control background.
    ButtonFace,
    /// Unvisited links.
    LinkText,
    /// Explicit color; alpha in `0.0..=1.0`.
    Rgba(u8, u8, u8, f32),
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::CanvasText => f.write_str("CanvasText"),
            Color::GrayText => f.write_str("GrayText"),
            Color::Canvas => f.write_str("Canvas"),
            Color::ButtonFace => f.write_str("ButtonFace"),
            Color::LinkText => f.write_str("LinkText"),
            Color::Rgba(r, g, b, a) => {
                let alpha = if a.is_finite() { a.clamp(0.0, 1.0) } else { 1.0 };
                write!(f, "rgba({r}, {g}, {b}, {alpha})")
            }
        }
    }
}

/// Rendering configuration for a [`ReadableDoc`](crate::ReadableDoc).
///
/// # Example
///
/// ```rust
/// use reeeed::Theme;
///
/// let theme = Theme { font_size: 18, is_bold: true, ..Theme::default() };
/// let raw = theme.to_raw_value();
/// assert_eq!(Theme::from_raw_value(&raw), theme);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Body text color.
    #[serde(skip, default = "default_foreground")]
    pub foreground: Color,

    /// Secondary text color, used for the metadata line and buttons.
    #[serde(skip, default = "default_secondary_foreground")]
    pub secondary_foreground: Color,

    /// Page background.
    #[serde(skip, default = "default_background")]
    pub background: Color,

    /// Button background.
    #[serde(skip, default = "default_secondary_background")]
    pub secondary_background: Color,

    /// Link color.
    #[serde(skip, default = "default_link")]
    pub link: Color,

    /// Font family name, e.g. `system-ui` or `Georgia`.
    pub font_name: String,

    /// Font size in CSS pixels.
    pub font_size: u32,

    /// Bold body text.
    pub is_bold: bool,

    /// Line height as a multiple of the font size.
    pub line_height: f64,

    /// Raw CSS appended after the theme styles, unvalidated.
    #[serde(rename = "additionalCSS", default, skip_serializing_if = "Option::is_none")]
    pub additional_css: Option<String>,
}

fn default_foreground() -> Color {
    Color::CanvasText
}

fn default_secondary_foreground() -> Color {
    Color::GrayText
}

fn default_background() -> Color {
    Color::Canvas
}

fn default_secondary_background() -> Color {
    Color::ButtonFace
}

fn default_link() -> Color {
    Color::LinkText
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            foreground: default_foreground(),
            secondary_foreground: default_secondary_foreground(),
            background: default_background(),
            secondary_background: default_secondary_background(),
            link: default_link(),
            font_name: "system-ui".to_string(),
            font_size: 16,
            is_bold: false,
            line_height: 1.5,
            additional_css: None,
        }
    }
}

impl Theme {
    /// Serialize to the preference string form.
    #[must_use]
    pub fn to_raw_value(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decode a preference string, falling back to the default theme when
    /// it cannot be decoded.
    #[must_use]
    pub fn from_raw_value(raw: &str) -> Self {
        Self::from_json(raw).unwrap_or_default()
    }

    /// Strict decoding. `fontName`, `fontSize`, `isBold` and `lineHeight`
    /// are required; `additionalCSS` is optional.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// The theme's style sheet, without the additional CSS.
    ///
    /// Output depends only on the theme's fields.
    #[must_use]
    pub fn to_css(&self) -> String {
        let weight = if self.is_bold { "bold" } else { "normal" };
        let line_height = if self.line_height.is_finite() && self.line_height > 0.0 {
            self.line_height
        } else {
            Theme::default().line_height
        };
        let font_size = self.font_size.max(1);

        format!(
            r#":root {{ color-scheme: light dark; }}
html, body {{ margin: 0; padding: 0; background-color: {background}; }}
body {{
  color: {foreground};
  font-family: {font_family};
  font-size: {font_size}px;
  font-weight: {weight};
  line-height: {line_height};
  -webkit-text-size-adjust: 100%;
  overflow-wrap: break-word;
}}
a {{ color: {link}; }}
#__reader_container {{ max-width: 700px; margin: 0 auto; padding: 1.5em 1.25em 3em; }}
#__reader_title {{ font-size: 1.6em; line-height: 1.25; margin: 0.5em 0 0.3em; }}
#__reader_meta {{ color: {secondary_foreground}; font-size: 0.85em; margin: 0 0 1.5em; }}
#__reader_exit {{ display: inline-block; margin: 1em 0 0; padding: 0.4em 0.9em; border-radius: 6px; background-color: {secondary_background}; color: {secondary_foreground}; font-size: 0.85em; text-decoration: none; }}
img, video, iframe, svg, figure, picture {{ max-width: 100%; height: auto; }}
figure {{ margin: 1.5em 0; }}
figcaption, small {{ color: {secondary_foreground}; font-size: 0.85em; }}
pre, code {{ font-family: ui-monospace, monospace; font-size: 0.9em; }}
pre {{ overflow-x: auto; padding: 0.8em; background-color: {secondary_background}; }}
blockquote {{ margin: 1em 0; padding-left: 1em; border-left: 3px solid {secondary_foreground}; color: {secondary_foreground}; }}
table {{ border-collapse: collapse; max-width: 100%; overflow-x: auto; display: block; }}
td, th {{ padding: 0.3em 0.6em; border: 1px solid {secondary_background}; }}
"#,
            background = self.background,
            foreground = self.foreground,
            font_family = css_font_family(&self.font_name),
            link = self.link,
            secondary_foreground = self.secondary_foreground,
            secondary_background = self.secondary_background,
        )
    }
}

/// Font family declaration with a generic fallback.
///
/// Non-generic names are quoted; quotes, backslashes and `<` are escaped so
/// the name cannot end the string or the surrounding `<style>` element.
fn css_font_family(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return "system-ui, sans-serif".to_string();
    }
    if GENERIC_FONT_FAMILIES.contains(&name.to_ascii_lowercase().as_str()) {
        return format!("{}, sans-serif", name.to_ascii_lowercase());
    }

    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for c in name.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '<' => quoted.push_str("\\3C "),
            '\n' | '\r' => quoted.push(' '),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    format!("{quoted}, system-ui, sans-serif")
}
