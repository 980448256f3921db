use std::fs;
use std::path::PathBuf;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::Deserialize;

use crate::config::ThemeName;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

/// A `#rrggbb` colour, validated when the theme file is parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct HexColor(Color);

impl HexColor {
    pub fn parse(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self(Color::Rgb(channel(0)?, channel(2)?, channel(4)?)))
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s).ok_or_else(|| format!("expected #rrggbb, got {s:?}"))
    }
}

/// Declares the palette struct and one `Color` accessor per slot.
macro_rules! palette {
    ($($slot:ident),* $(,)?) => {
        #[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
        pub struct ThemeColors {
            $(pub $slot: HexColor,)*
        }

        impl ThemeColors {
            $(
                pub fn $slot(&self) -> Color {
                    self.$slot.0
                }
            )*
        }
    };
}

palette! {
    bg,
    fg,
    text_correct,
    text_incorrect,
    text_incorrect_bg,
    text_pending,
    text_skipped,
    text_cursor_bg,
    text_cursor_fg,
    line_number,
    accent,
    border,
    border_focused,
    header_bg,
    header_fg,
    bar_filled,
    bar_empty,
    error,
    warning,
    success,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

impl Theme {
    /// `<config>/codetyper/themes/<name>.toml` if present and valid, else the
    /// bundled file of that name.
    pub fn load(name: &str) -> Option<Self> {
        let file_name = format!("{name}.toml");

        if let Some(path) = user_theme_dir().map(|dir| dir.join(&file_name)) {
            if let Ok(content) = fs::read_to_string(&path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(e) => log::warn!("ignoring theme {}: {e}", path.display()),
                }
            }
        }

        let asset = ThemeAssets::get(&file_name)?;
        let content = std::str::from_utf8(asset.data.as_ref()).ok()?;
        match toml::from_str::<Theme>(content) {
            Ok(theme) => Some(theme),
            Err(e) => {
                log::error!("bundled theme {name} is invalid: {e}");
                None
            }
        }
    }

    pub fn for_setting(name: ThemeName) -> Self {
        Self::load(name.as_str()).unwrap_or_default()
    }
}

fn user_theme_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("codetyper").join("themes"))
}

/// Last resort when no theme file parses: the terminal's own named colours.
impl Default for Theme {
    fn default() -> Self {
        let c = HexColor;
        Self {
            name: "terminal".to_string(),
            colors: ThemeColors {
                bg: c(Color::Reset),
                fg: c(Color::Reset),
                text_correct: c(Color::Green),
                text_incorrect: c(Color::Red),
                text_incorrect_bg: c(Color::Reset),
                text_pending: c(Color::DarkGray),
                text_skipped: c(Color::DarkGray),
                text_cursor_bg: c(Color::White),
                text_cursor_fg: c(Color::Black),
                line_number: c(Color::DarkGray),
                accent: c(Color::Cyan),
                border: c(Color::DarkGray),
                border_focused: c(Color::Cyan),
                header_bg: c(Color::Reset),
                header_fg: c(Color::Reset),
                bar_filled: c(Color::Cyan),
                bar_empty: c(Color::DarkGray),
                error: c(Color::Red),
                warning: c(Color::Yellow),
                success: c(Color::Green),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_themes_parse() {
        for name in [ThemeName::Dark, ThemeName::Light] {
            let theme = Theme::load(name.as_str()).expect("bundled theme");
            assert_eq!(theme.name, name.as_str());
        }
    }

    #[test]
    fn test_bundled_themes_differ() {
        let dark = Theme::load("dark").unwrap();
        let light = Theme::load("light").unwrap();
        assert_ne!(dark.colors.bg(), light.colors.bg());
    }

    #[test]
    fn test_hex_color_parse() {
        assert_eq!(HexColor::parse("#ff8000"), Some(HexColor(Color::Rgb(255, 128, 0))));
        assert_eq!(HexColor::parse("ff8000"), None);
        assert_eq!(HexColor::parse("#ff80"), None);
        assert_eq!(HexColor::parse("#gg8000"), None);
        assert_eq!(HexColor::parse("#ffé000"), None);
    }

    #[test]
    fn test_bad_colour_rejects_theme() {
        let asset = ThemeAssets::get("dark.toml").unwrap();
        let content = String::from_utf8(asset.data.to_vec()).unwrap();
        let broken = content.replace("#1e1e2e", "navy");
        assert!(toml::from_str::<Theme>(&broken).is_err());
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        assert!(Theme::load("no-such-theme").is_none());
        let theme = Theme::default();
        assert_eq!(theme.colors.text_correct(), Color::Green);
    }
}
