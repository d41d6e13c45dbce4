use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// A CSS color value chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Color(String);

impl Color {
    /// The color every indicator starts from and returns to on clear.
    pub fn black() -> Self {
        Self("#000000".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Color {
    type Err = ParseError;

    /// Accepts any single CSS token; rejects characters that could end the
    /// declaration or the attribute it lands in.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.is_empty() || value.contains([';', '"', '<', '>', '{', '}']) {
            return Err(ParseError::InvalidColor(s.to_string()));
        }
        Ok(Self(value.to_string()))
    }
}

/// Font size presets, or an explicit pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Small,
    Medium,
    Large,
    Px(u32),
}

impl FontSize {
    pub fn css_value(self) -> String {
        match self {
            FontSize::Small => "10px".to_string(),
            FontSize::Medium => "14px".to_string(),
            FontSize::Large => "18px".to_string(),
            FontSize::Px(px) => format!("{px}px"),
        }
    }
}

impl FromStr for FontSize {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "small" => Ok(FontSize::Small),
            "medium" => Ok(FontSize::Medium),
            "large" => Ok(FontSize::Large),
            other => other
                .strip_suffix("px")
                .unwrap_or(other)
                .parse::<u32>()
                .map(FontSize::Px)
                .map_err(|_| ParseError::UnknownValue {
                    kind: "font size",
                    value: s.to_string(),
                }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

impl HorizontalAlign {
    /// Value of the flex cross-axis property (`align-items`).
    pub fn flex_value(self) -> &'static str {
        match self {
            HorizontalAlign::Left => "flex-start",
            HorizontalAlign::Center => "center",
            HorizontalAlign::Right => "flex-end",
        }
    }
}

impl FromStr for HorizontalAlign {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "left" => Ok(HorizontalAlign::Left),
            "center" => Ok(HorizontalAlign::Center),
            "right" => Ok(HorizontalAlign::Right),
            other => Err(ParseError::UnknownValue {
                kind: "horizontal alignment",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

impl VerticalAlign {
    /// Value of the flex main-axis property (`justify-content`).
    pub fn flex_value(self) -> &'static str {
        match self {
            VerticalAlign::Top => "flex-start",
            VerticalAlign::Middle => "center",
            VerticalAlign::Bottom => "flex-end",
        }
    }
}

impl FromStr for VerticalAlign {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "top" => Ok(VerticalAlign::Top),
            "middle" => Ok(VerticalAlign::Middle),
            "bottom" => Ok(VerticalAlign::Bottom),
            other => Err(ParseError::UnknownValue {
                kind: "vertical alignment",
                value: other.to_string(),
            }),
        }
    }
}

/// A formatting operation requested by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatCommand {
    Bold,
    Italic,
    FontSize(FontSize),
    TextColor(Color),
    BackgroundColor(Color),
    BorderColor(Color),
    HorizontalAlign(HorizontalAlign),
    VerticalAlign(VerticalAlign),
    /// Link the selection; without a URL the host is prompted for one.
    Link { url: Option<String> },
}

/// Where a command's style lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Scope {
    /// Wraps the selected range in a span carrying one declaration.
    Inline {
        property: &'static str,
        value: String,
        /// Whether a collapsed cursor keeps the style for typed text
        typing: bool,
    },
    /// Declarations set on the region itself, whatever the selection.
    Region(Vec<(&'static str, String)>),
    Link,
}

impl FormatCommand {
    /// Resolve the command to concrete declarations.
    ///
    /// Bold and italic switch off when the selection already carries them.
    pub(crate) fn scope(&self, bold_active: bool, italic_active: bool) -> Scope {
        match self {
            FormatCommand::Bold => Scope::Inline {
                property: "font-weight",
                value: if bold_active { "normal" } else { "bold" }.to_string(),
                typing: true,
            },
            FormatCommand::Italic => Scope::Inline {
                property: "font-style",
                value: if italic_active { "normal" } else { "italic" }.to_string(),
                typing: true,
            },
            FormatCommand::FontSize(size) => Scope::Inline {
                property: "font-size",
                value: size.css_value(),
                typing: false,
            },
            FormatCommand::TextColor(color) => Scope::Inline {
                property: "color",
                value: color.to_string(),
                typing: true,
            },
            FormatCommand::BackgroundColor(color) => Scope::Inline {
                property: "background-color",
                value: color.to_string(),
                typing: true,
            },
            FormatCommand::BorderColor(color) => {
                Scope::Region(vec![("border", format!("2px solid {color}"))])
            }
            FormatCommand::HorizontalAlign(align) => Scope::Region(vec![
                ("display", "flex".to_string()),
                ("flex-direction", "column".to_string()),
                ("align-items", align.flex_value().to_string()),
            ]),
            FormatCommand::VerticalAlign(align) => Scope::Region(vec![
                ("display", "flex".to_string()),
                ("flex-direction", "column".to_string()),
                ("justify-content", align.flex_value().to_string()),
            ]),
            FormatCommand::Link { .. } => Scope::Link,
        }
    }
}
