use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::Rgba8,
    error::{ForgeError, ForgeResult},
};

/// Named output size for generated backgrounds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundSize {
    /// Key (`desktop`, `twitter`, ...).
    pub name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Human-readable description.
    pub description: String,
}

/// Named palette for generated backgrounds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTheme {
    /// Display name.
    pub name: String,
    /// Colors interpolated left to right.
    pub colors: Vec<Rgba8>,
}

/// Background generator presets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundPresets {
    /// Output sizes.
    pub sizes: Vec<BackgroundSize>,
    /// Palettes.
    pub themes: Vec<ColorTheme>,
}

impl BackgroundPresets {
    /// Size preset by case-insensitive name.
    pub fn size(&self, name: &str) -> ForgeResult<&BackgroundSize> {
        self.sizes
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| ForgeError::validation(format!("unknown background size \"{name}\"")))
    }

    /// Theme by case-insensitive name.
    pub fn theme(&self, name: &str) -> ForgeResult<&ColorTheme> {
        self.themes
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| ForgeError::validation(format!("unknown color theme \"{name}\"")))
    }

    /// Reject zero sizes and empty palettes.
    pub fn validate(&self) -> ForgeResult<()> {
        if let Some(s) = self.sizes.iter().find(|s| s.width == 0 || s.height == 0) {
            return Err(ForgeError::validation(format!(
                "background size \"{}\" must be non-empty",
                s.name
            )));
        }
        if let Some(t) = self.themes.iter().find(|t| t.colors.is_empty()) {
            return Err(ForgeError::validation(format!(
                "color theme \"{}\" has no colors",
                t.name
            )));
        }
        Ok(())
    }
}

impl Default for BackgroundPresets {
    fn default() -> Self {
        let size = |name: &str, width, height, description: &str| BackgroundSize {
            name: name.to_string(),
            width,
            height,
            description: description.to_string(),
        };
        let theme = |name: &str, colors: [u32; 3]| ColorTheme {
            name: name.to_string(),
            colors: colors
                .iter()
                .map(|&c| Rgba8::new((c >> 16) as u8, (c >> 8) as u8, c as u8, 255))
                .collect(),
        };
        Self {
            sizes: vec![
                size("custom", 800, 600, "Custom Size"),
                size("desktop", 1920, 1080, "Desktop Wallpaper (1920x1080)"),
                size("mobile", 1080, 1920, "Mobile Wallpaper (1080x1920)"),
                size("twitter", 1500, 500, "Twitter/X Cover (1500x500)"),
                size("instagram", 1080, 1080, "Instagram Square (1080x1080)"),
                size("facebook", 1200, 628, "Facebook Cover (1200x628)"),
                size("linkedin", 1584, 396, "LinkedIn Cover (1584x396)"),
                size("youtube", 1280, 720, "YouTube Cover (1280x720)"),
                size("rednote", 1080, 1440, "Rednote Post (1080x1440)"),
            ],
            themes: vec![
                theme("Ghibli Sky", [0x86A7C5, 0xBFC2DE, 0xF6F3E9]),
                theme("Forest Path", [0x91AD70, 0xD6A489, 0xE4B4B4]),
                theme("Modern Blue", [0x2563EB, 0x60A5FA, 0xDBEAFE]),
                theme("Sunset", [0xF97316, 0xFDBA74, 0xFFF7ED]),
                theme("Purple Dream", [0x7C3AED, 0xA78BFA, 0xEDE9FE]),
                theme("Jungle", [0x059669, 0x34D399, 0xECFDF5]),
                theme("Coral Reef", [0xDB2777, 0xF472B6, 0xFCE7F3]),
                theme("Dark Mode", [0x18181B, 0x3F3F46, 0x71717A]),
            ],
        }
    }
}
