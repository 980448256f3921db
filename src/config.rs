use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::Difficulty;

pub const FONT_SIZES: &[u16] = &[12, 13, 14, 16, 18];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

impl ThemeName {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeName::Dark => "dark",
            ThemeName::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeName::Dark => ThemeName::Light,
            ThemeName::Light => ThemeName::Dark,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyFilter {
    #[default]
    All,
    Easy,
    Medium,
    Hard,
}

impl DifficultyFilter {
    const ORDER: [DifficultyFilter; 4] = [
        DifficultyFilter::All,
        DifficultyFilter::Easy,
        DifficultyFilter::Medium,
        DifficultyFilter::Hard,
    ];

    pub fn matches(self, difficulty: Difficulty) -> bool {
        match self {
            DifficultyFilter::All => true,
            DifficultyFilter::Easy => difficulty == Difficulty::Easy,
            DifficultyFilter::Medium => difficulty == Difficulty::Medium,
            DifficultyFilter::Hard => difficulty == Difficulty::Hard,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyFilter::All => "all",
            DifficultyFilter::Easy => "easy",
            DifficultyFilter::Medium => "medium",
            DifficultyFilter::Hard => "hard",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|&f| f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|&f| f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
}

impl Language {
    pub fn locale(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Ru,
            Language::Ru => Language::En,
        }
    }
}

/// User-facing preferences, persisted next to the profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: ThemeName,
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
    #[serde(default = "default_show_line_numbers")]
    pub show_line_numbers: bool,
    #[serde(default = "default_font_size")]
    pub font_size: u16,
    #[serde(default)]
    pub difficulty: DifficultyFilter,
    #[serde(default)]
    pub language: Language,
}

fn default_sound_enabled() -> bool {
    true
}
fn default_show_line_numbers() -> bool {
    true
}
fn default_font_size() -> u16 {
    14
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemeName::default(),
            sound_enabled: default_sound_enabled(),
            show_line_numbers: default_show_line_numbers(),
            font_size: default_font_size(),
            difficulty: DifficultyFilter::default(),
            language: Language::default(),
        }
    }
}

impl Settings {
    /// Snap values that a hand-edited file may have put out of range.
    pub fn validate(&mut self) {
        if !FONT_SIZES.contains(&self.font_size) {
            self.font_size = default_font_size();
        }
    }

    pub fn next_font_size(&self) -> u16 {
        FONT_SIZES
            .iter()
            .copied()
            .find(|&s| s > self.font_size)
            .unwrap_or(FONT_SIZES[FONT_SIZES.len() - 1])
    }

    pub fn prev_font_size(&self) -> u16 {
        FONT_SIZES
            .iter()
            .rev()
            .copied()
            .find(|&s| s < self.font_size)
            .unwrap_or(FONT_SIZES[0])
    }
}

/// Default location for profile, settings and log.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("codetyper")
}

/// Optional directory of extra snippet files.
pub fn user_snippet_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("codetyper").join("snippets"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_serde_defaults_from_empty() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.font_size, 14);
        assert!(settings.sound_enabled);
        assert_eq!(settings.difficulty, DifficultyFilter::All);
        assert_eq!(settings.language, Language::En);
    }

    #[test]
    fn test_settings_partial_file() {
        let toml_str = r#"
theme = "light"
difficulty = "hard"
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.theme, ThemeName::Light);
        assert_eq!(settings.difficulty, DifficultyFilter::Hard);
        assert!(settings.show_line_numbers);
    }

    #[test]
    fn test_settings_serde_roundtrip() {
        let mut settings = Settings::default();
        settings.language = Language::Ru;
        settings.sound_enabled = false;
        let serialized = toml::to_string_pretty(&settings).unwrap();
        let deserialized: Settings = toml::from_str(&serialized).unwrap();
        assert_eq!(settings, deserialized);
    }

    #[test]
    fn test_validate_resets_unknown_font_size() {
        let mut settings = Settings::default();
        settings.font_size = 15;
        settings.validate();
        assert_eq!(settings.font_size, 14);

        settings.font_size = 18;
        settings.validate();
        assert_eq!(settings.font_size, 18);
    }

    #[test]
    fn test_font_size_stepping_clamps() {
        let mut settings = Settings::default();
        assert_eq!(settings.next_font_size(), 16);
        assert_eq!(settings.prev_font_size(), 13);
        settings.font_size = 18;
        assert_eq!(settings.next_font_size(), 18);
        settings.font_size = 12;
        assert_eq!(settings.prev_font_size(), 12);
    }

    #[test]
    fn test_difficulty_filter_cycles() {
        assert_eq!(DifficultyFilter::All.next(), DifficultyFilter::Easy);
        assert_eq!(DifficultyFilter::Hard.next(), DifficultyFilter::All);
        assert_eq!(DifficultyFilter::All.prev(), DifficultyFilter::Hard);
        assert!(DifficultyFilter::Medium.matches(Difficulty::Medium));
        assert!(!DifficultyFilter::Medium.matches(Difficulty::Easy));
    }
}
