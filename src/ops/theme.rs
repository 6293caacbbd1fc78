use std::fmt;

use serde::Serialize;

use crate::model::state::ThemePreference;

/// The theme actually drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveTheme {
    Light,
    Dark,
}

impl fmt::Display for EffectiveTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectiveTheme::Light => f.write_str("light"),
            EffectiveTheme::Dark => f.write_str("dark"),
        }
    }
}

/// Map the stored preference to a concrete theme. Only `system` consults
/// the OS signal.
pub fn resolve(preference: ThemePreference, os_prefers_dark: bool) -> EffectiveTheme {
    match preference {
        ThemePreference::Light => EffectiveTheme::Light,
        ThemePreference::Dark => EffectiveTheme::Dark,
        ThemePreference::System if os_prefers_dark => EffectiveTheme::Dark,
        ThemePreference::System => EffectiveTheme::Light,
    }
}

/// Source of the OS dark-mode signal
pub trait Appearance {
    fn prefers_dark(&self) -> bool;
}

/// Dark-mode signal for a terminal session.
///
/// A configured override wins; otherwise `COLORFGBG` (set by many terminal
/// emulators as `fg;bg`) decides. It is read once at startup since the
/// environment of a running process does not change. Unknown means dark.
#[derive(Debug, Clone, Copy)]
pub struct TerminalAppearance {
    dark: bool,
}

impl TerminalAppearance {
    /// `configured` is the `[ui] system_theme` value, if any.
    pub fn new(configured: Option<&str>) -> Self {
        let colorfgbg = std::env::var("COLORFGBG").ok();
        Self::from_signals(configured, colorfgbg.as_deref())
    }

    fn from_signals(configured: Option<&str>, colorfgbg: Option<&str>) -> Self {
        let forced = match configured.map(|s| s.trim().to_ascii_lowercase()) {
            Some(s) if s == "dark" => Some(true),
            Some(s) if s == "light" => Some(false),
            Some(other) => {
                tracing::warn!(value = %other, "ignoring unknown ui.system_theme");
                None
            }
            None => None,
        };
        let dark = forced
            .or_else(|| colorfgbg.and_then(dark_from_colorfgbg))
            .unwrap_or(true);
        TerminalAppearance { dark }
    }
}

impl Appearance for TerminalAppearance {
    fn prefers_dark(&self) -> bool {
        self.dark
    }
}

/// Parse `COLORFGBG` ("15;0", "0;default;15"). The last field is the
/// background colour index; 7 and 15 are the light greys/white.
fn dark_from_colorfgbg(value: &str) -> Option<bool> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(!matches!(bg, 7 | 15))
}

/// A fixed signal, for tests and headless use
#[derive(Debug, Clone, Copy)]
pub struct FixedAppearance(pub bool);

impl Appearance for FixedAppearance {
    fn prefers_dark(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_preferences_ignore_os() {
        assert_eq!(resolve(ThemePreference::Light, true), EffectiveTheme::Light);
        assert_eq!(resolve(ThemePreference::Dark, false), EffectiveTheme::Dark);
    }

    #[test]
    fn system_follows_os() {
        assert_eq!(resolve(ThemePreference::System, true), EffectiveTheme::Dark);
        assert_eq!(resolve(ThemePreference::System, false), EffectiveTheme::Light);
    }

    #[test]
    fn colorfgbg_parsing() {
        assert_eq!(dark_from_colorfgbg("15;0"), Some(true));
        assert_eq!(dark_from_colorfgbg("0;15"), Some(false));
        assert_eq!(dark_from_colorfgbg("0;default;7"), Some(false));
        assert_eq!(dark_from_colorfgbg("12;8"), Some(true));
        assert_eq!(dark_from_colorfgbg("default"), None);
        assert_eq!(dark_from_colorfgbg(""), None);
    }

    #[test]
    fn configured_override_wins() {
        assert!(TerminalAppearance::new(Some("dark")).prefers_dark());
        assert!(!TerminalAppearance::new(Some(" Light ")).prefers_dark());
    }

    #[test]
    fn terminal_signal_is_captured_at_startup() {
        assert!(!TerminalAppearance::from_signals(None, Some("0;15")).prefers_dark());
        assert!(TerminalAppearance::from_signals(None, Some("15;0")).prefers_dark());
        assert!(TerminalAppearance::from_signals(None, None).prefers_dark());
        assert!(TerminalAppearance::from_signals(Some("dark"), Some("0;15")).prefers_dark());
        assert!(!TerminalAppearance::from_signals(Some("bogus"), Some("0;7")).prefers_dark());
    }

    #[test]
    fn fixed_appearance() {
        assert!(FixedAppearance(true).prefers_dark());
        assert!(!FixedAppearance(false).prefers_dark());
    }
}
