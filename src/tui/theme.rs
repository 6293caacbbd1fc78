use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::config::UiConfig;
use crate::ops::theme::EffectiveTheme;

/// Colors for one effective theme
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    /// Recurring marker
    pub accent: Color,
    pub error: Color,
    pub selection_bg: Color,
}

impl Palette {
    pub fn dark() -> Self {
        Palette {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            accent: Color::Rgb(0x44, 0xDD, 0xFF),
            error: Color::Rgb(0xFF, 0x44, 0x44),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
        }
    }

    pub fn light() -> Self {
        Palette {
            background: Color::Rgb(0xFA, 0xF8, 0xF2),
            text: Color::Rgb(0x2E, 0x2A, 0x4F),
            text_bright: Color::Rgb(0x00, 0x00, 0x00),
            highlight: Color::Rgb(0xC2, 0x18, 0x5B),
            dim: Color::Rgb(0x8A, 0x86, 0xA8),
            accent: Color::Rgb(0x00, 0x7A, 0x99),
            error: Color::Rgb(0xC6, 0x28, 0x28),
            selection_bg: Color::Rgb(0xF3, 0xD9, 0xE6),
        }
    }

    /// Built-in palette for `theme` with `[ui.colors.<theme>]` overrides
    pub fn for_theme(theme: EffectiveTheme, ui: &UiConfig) -> Self {
        let (mut palette, overrides) = match theme {
            EffectiveTheme::Light => (Palette::light(), &ui.colors.light),
            EffectiveTheme::Dark => (Palette::dark(), &ui.colors.dark),
        };
        palette.apply(overrides);
        palette
    }

    fn apply(&mut self, overrides: &HashMap<String, String>) {
        for (key, value) in overrides {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(%key, %value, "ignoring invalid color");
                continue;
            };
            match key.as_str() {
                "background" => self.background = color,
                "text" => self.text = color,
                "text_bright" => self.text_bright = color,
                "highlight" => self.highlight = color,
                "dim" => self.dim = color,
                "accent" => self.accent = color,
                "error" => self.error = color,
                "selection_bg" => self.selection_bg = color,
                _ => tracing::warn!(%key, "ignoring unknown color slot"),
            }
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#FF4444"),
            Some(Color::Rgb(0xFF, 0x44, 0x44))
        );
        assert_eq!(parse_hex_color("FF4444"), None); // missing #
        assert_eq!(parse_hex_color("#FF44"), None); // too short
        assert_eq!(parse_hex_color("#ZZZZZZ"), None);
    }

    #[test]
    fn overrides_apply_to_their_theme_only() {
        let mut ui = UiConfig::default();
        ui.colors.dark.insert("accent".into(), "#112233".into());
        ui.colors.dark.insert("text".into(), "not-a-color".into());

        let dark = Palette::for_theme(EffectiveTheme::Dark, &ui);
        assert_eq!(dark.accent, Color::Rgb(0x11, 0x22, 0x33));
        assert_eq!(dark.text, Palette::dark().text);

        let light = Palette::for_theme(EffectiveTheme::Light, &ui);
        assert_eq!(light, Palette::light());
    }

    #[test]
    fn themes_differ() {
        assert_ne!(Palette::light().background, Palette::dark().background);
    }
}
