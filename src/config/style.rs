//! Chat colors, configurable through `[style]` in the config file.

use std::fmt;
use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A terminal color written as a name (`"cyan"`), index (`"42"`) or hex
/// (`"#1e90ff"`) in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleColor(pub Color);

impl From<StyleColor> for Color {
    fn from(c: StyleColor) -> Self {
        c.0
    }
}

impl Serialize for StyleColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for StyleColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ColorVisitor;

        impl de::Visitor<'_> for ColorVisitor {
            type Value = StyleColor;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a color name, index or #rrggbb")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<StyleColor, E> {
                Color::from_str(v)
                    .map(StyleColor)
                    .map_err(|_| E::custom(format!("invalid color `{}`", v)))
            }
        }

        deserializer.deserialize_str(ColorVisitor)
    }
}

/// Colors used by the message cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatStyle {
    pub agent_cell_color: StyleColor,
    pub customer_cell_color: StyleColor,
    pub agent_font_color: StyleColor,
    pub customer_font_color: StyleColor,
    /// Text inside link, media and rich cells.
    pub form_text_color: StyleColor,
    /// Secondary labels: hosts, timestamps, hints.
    pub secondary_text_color: StyleColor,
    /// Buttons and selectable options.
    pub accent_color: StyleColor,
    /// Highlight of the focused option.
    pub selection_color: StyleColor,
}

impl Default for ChatStyle {
    fn default() -> Self {
        Self {
            agent_cell_color: StyleColor(Color::Gray),
            customer_cell_color: StyleColor(Color::Blue),
            agent_font_color: StyleColor(Color::Black),
            customer_font_color: StyleColor(Color::White),
            form_text_color: StyleColor(Color::White),
            secondary_text_color: StyleColor(Color::DarkGray),
            accent_color: StyleColor(Color::Cyan),
            selection_color: StyleColor(Color::Yellow),
        }
    }
}

impl ChatStyle {
    /// Bubble style for a text cell.
    pub fn bubble(&self, is_agent: bool) -> Style {
        if is_agent {
            Style::default()
                .fg(self.agent_font_color.into())
                .bg(self.agent_cell_color.into())
        } else {
            Style::default()
                .fg(self.customer_font_color.into())
                .bg(self.customer_cell_color.into())
        }
    }

    pub fn form_text(&self) -> Style {
        Style::default().fg(self.form_text_color.into())
    }

    pub fn secondary(&self) -> Style {
        Style::default().fg(self.secondary_text_color.into())
    }

    /// Style of a selectable option, highlighted when focused.
    pub fn option(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(Color::Black)
                .bg(self.selection_color.into())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.accent_color.into())
        }
    }
}
