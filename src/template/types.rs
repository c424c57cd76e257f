//! Template and variable struct types.
//!
//! All types derive `Serialize + Deserialize` with camelCase field names, so
//! the same structs serve the Rust API, the HTTP API, and JSON export.

use serde::de::IntoDeserializer;
use serde::de::value::StrDeserializer;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Default title for new templates.
pub const DEFAULT_TITLE: &str = "Untitled Document";

/// Default page size key for new templates.
pub const DEFAULT_PAGE_SIZE: &str = "a4";

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_page_size() -> String {
    DEFAULT_PAGE_SIZE.to_string()
}

fn default_true() -> bool {
    true
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_font_size() -> f64 {
    12.0
}

fn default_color() -> String {
    "#000000".to_string()
}

/// Treat `""` like a missing value. Older editors cleared toggles that way.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => {
            let de: StrDeserializer<'_, D::Error> = s.into_deserializer();
            T::deserialize(de).map(Some)
        }
    }
}

// ============================================================================
// FORMAT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Text formatting of a variable.
///
/// Optional fields that are `None` behave as normal / none / left and are
/// left out of serialized JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableFormat {
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Font size in points. Always positive.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    /// Hex colour, `#rrggbb` or `#rgb`.
    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for VariableFormat {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_size: default_font_size(),
            font_weight: None,
            font_style: None,
            text_decoration: None,
            text_align: None,
            color: default_color(),
        }
    }
}

impl VariableFormat {
    #[inline]
    pub fn is_bold(&self) -> bool {
        self.font_weight == Some(FontWeight::Bold)
    }

    #[inline]
    pub fn is_italic(&self) -> bool {
        self.font_style == Some(FontStyle::Italic)
    }

    #[inline]
    pub fn is_underline(&self) -> bool {
        self.text_decoration == Some(TextDecoration::Underline)
    }

    /// Effective alignment, `Left` when unset.
    #[inline]
    pub fn align(&self) -> TextAlign {
        self.text_align.unwrap_or_default()
    }

    /// Flip bold. Absent and normal both toggle to bold; bold toggles to normal.
    pub fn toggle_bold(&mut self) {
        self.font_weight = Some(if self.is_bold() {
            FontWeight::Normal
        } else {
            FontWeight::Bold
        });
    }

    pub fn toggle_italic(&mut self) {
        self.font_style = Some(if self.is_italic() {
            FontStyle::Normal
        } else {
            FontStyle::Italic
        });
    }

    pub fn toggle_underline(&mut self) {
        self.text_decoration = Some(if self.is_underline() {
            TextDecoration::None
        } else {
            TextDecoration::Underline
        });
    }

    /// Parse `color` into RGB components.
    ///
    /// Accepts `#rrggbb` and `#rgb`. Returns `None` for anything else.
    pub fn rgb(&self) -> Option<[u8; 3]> {
        parse_hex_color(&self.color)
    }
}

/// Parse a `#rrggbb` or `#rgb` colour string.
pub fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let hex = s.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some([r, g, b])
        }
        3 => {
            let mut out = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v * 17;
            }
            Some(out)
        }
        _ => None,
    }
}

// ============================================================================
// VARIABLE
// ============================================================================

/// A positioned, formatted piece of literal text.
///
/// `x` and `y` are canvas pixel coordinates for the owning template's page
/// size. They must go through [`crate::page::to_physical`] before being used
/// in a physical coordinate system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: Uuid,
    pub title: String,
    pub value: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub format: VariableFormat,
}

impl Variable {
    /// Create a variable with a fresh id and the default format.
    pub fn new(title: impl Into<String>, value: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            value: value.into(),
            x,
            y,
            format: VariableFormat::default(),
        }
    }

    pub fn with_format(mut self, format: VariableFormat) -> Self {
        self.format = format;
        self
    }
}

// ============================================================================
// TEMPLATE
// ============================================================================

/// The top-level document definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: Uuid,
    #[serde(default = "default_title")]
    pub title: String,
    /// Key into the page size table. Unknown keys behave as "a4".
    #[serde(default = "default_page_size")]
    pub page_size: String,
    /// Opaque image reference: a data URL or an upload URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default = "default_true")]
    pub show_background_in_output: bool,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: default_title(),
            page_size: default_page_size(),
            background_image: None,
            show_background_in_output: true,
            variables: Vec::new(),
        }
    }
}

impl Template {
    /// A fresh, empty template with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Title to use for exported file names.
    pub fn file_stem(&self, fallback: &str) -> String {
        let title = self.title.trim();
        let stem = if title.is_empty() { fallback } else { title };
        stem.chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_defaults() {
        let format = VariableFormat::default();
        assert_eq!(format.font_family, "Arial");
        assert_eq!(format.font_size, 12.0);
        assert_eq!(format.color, "#000000");
        assert!(!format.is_bold());
        assert_eq!(format.align(), TextAlign::Left);
    }

    #[test]
    fn test_toggle_bold_is_symmetric() {
        let mut format = VariableFormat::default();
        format.toggle_bold();
        assert!(format.is_bold());
        format.toggle_bold();
        assert!(!format.is_bold());
        assert_eq!(format.font_weight.unwrap_or_default(), FontWeight::Normal);
    }

    #[test]
    fn test_empty_toggle_strings_read_as_absent() {
        let json = r##"{"fontFamily":"Arial","fontSize":12,"fontWeight":"","fontStyle":"italic","color":"#000000"}"##;
        let format: VariableFormat = serde_json::from_str(json).unwrap();
        assert_eq!(format.font_weight, None);
        assert!(format.is_italic());
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff8000"), Some([255, 128, 0]));
        assert_eq!(parse_hex_color("#fff"), Some([255, 255, 255]));
        assert_eq!(parse_hex_color("ff8000"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
    }

    #[test]
    fn test_template_deserialize_defaults() {
        let json = r#"{"id":"6f1c0a4e-8f5b-4d52-9a3f-0a2b3c4d5e6f"}"#;
        let template: Template = serde_json::from_str(json).unwrap();
        assert_eq!(template.title, DEFAULT_TITLE);
        assert_eq!(template.page_size, "a4");
        assert!(template.show_background_in_output);
        assert!(template.variables.is_empty());
    }

    #[test]
    fn test_camel_case_field_names() {
        let mut template = Template::new();
        let mut var = Variable::new("Name", "Ada", 10.0, 20.0);
        var.format.toggle_italic();
        template.variables.push(var);
        let json = serde_json::to_string(&template).unwrap();
        assert!(json.contains("\"pageSize\""));
        assert!(json.contains("\"showBackgroundInOutput\""));
        assert!(json.contains("\"fontFamily\""));
        assert!(json.contains("\"fontStyle\":\"italic\""));
        assert!(!json.contains("fontWeight"));
        assert!(!json.contains("backgroundImage"));
    }

    #[test]
    fn test_file_stem() {
        let mut template = Template::new();
        template.title = "  ".into();
        assert_eq!(template.file_stem("document"), "document");
        template.title = "Q3/Invoice".into();
        assert_eq!(template.file_stem("document"), "Q3_Invoice");
    }
}
