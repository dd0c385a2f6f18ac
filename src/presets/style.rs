use serde::{Deserialize, Serialize};

use crate::{
    compose::gradient::{ColorStop, parse_css_linear_gradient},
    foundation::error::{ForgeError, ForgeResult},
};

/// Named CSS gradient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPreset {
    /// Display name.
    pub name: String,
    /// CSS `linear-gradient(...)`.
    pub gradient: String,
}

impl ColorPreset {
    /// Parsed color stops.
    pub fn stops(&self) -> ForgeResult<Vec<ColorStop>> {
        parse_css_linear_gradient(&self.gradient)
    }
}

/// Named ratio (title-area height or frame width).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatioPreset {
    /// Display name.
    pub name: String,
    /// Fraction in `(0, 1]`.
    pub value: f64,
}

/// Screenshot styling presets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StylePresets {
    /// Background gradients.
    pub colors: Vec<ColorPreset>,
    /// Title-area heights.
    pub title_areas: Vec<RatioPreset>,
    /// Frame widths.
    pub frame_widths: Vec<RatioPreset>,
}

impl StylePresets {
    /// Color preset by case-insensitive name.
    pub fn color(&self, name: &str) -> ForgeResult<&ColorPreset> {
        self.colors
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| ForgeError::validation(format!("unknown color preset \"{name}\"")))
    }

    /// Title-area ratio by case-insensitive name.
    pub fn title_area(&self, name: &str) -> ForgeResult<f64> {
        find_ratio(&self.title_areas, name, "title area")
    }

    /// Frame-width ratio by case-insensitive name.
    pub fn frame_width(&self, name: &str) -> ForgeResult<f64> {
        find_ratio(&self.frame_widths, name, "frame width")
    }

    /// Parse every gradient and range-check every ratio.
    pub fn validate(&self) -> ForgeResult<()> {
        for c in &self.colors {
            c.stops()?;
        }
        for r in self.title_areas.iter().chain(&self.frame_widths) {
            if !(r.value > 0.0 && r.value <= 1.0) {
                return Err(ForgeError::validation(format!(
                    "preset \"{}\" ratio must be in (0, 1], got {}",
                    r.name, r.value
                )));
            }
        }
        Ok(())
    }
}

fn find_ratio(list: &[RatioPreset], name: &str, what: &str) -> ForgeResult<f64> {
    list.iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
        .map(|p| p.value)
        .ok_or_else(|| ForgeError::validation(format!("unknown {what} preset \"{name}\"")))
}

impl Default for StylePresets {
    fn default() -> Self {
        let color = |name: &str, gradient: &str| ColorPreset {
            name: name.to_string(),
            gradient: gradient.to_string(),
        };
        let ratio = |name: &str, value: f64| RatioPreset {
            name: name.to_string(),
            value,
        };
        Self {
            colors: vec![
                color("Earth", "linear-gradient(135deg, #A1FF8B 0%, #3F93FF 96.83%)"),
                color(
                    "Airplane",
                    "linear-gradient(224.86deg, #73CCD8 4.87%, #2B6B9F 96.04%)",
                ),
                color("Grasshoper", "linear-gradient(135deg, #80F1A6 0%, #EFD000 100%)"),
                color(
                    "Sugar Cream",
                    "linear-gradient(225.4deg, #FEDC2A 0%, #DD5789 48.12%, #7A2C9E 93.59%)",
                ),
                color(
                    "Purple Sky",
                    "linear-gradient(51.06deg, #9358F7 0.87%, #7B78F2 25.96%, #6197EE 49.23%, #45B5E9 74.93%, #10D7E2 97.48%)",
                ),
                color("Red Sun", "linear-gradient(45.4deg, #F4426C 6.41%, #FBF2B1 98.99%)"),
                color("Blackberry", "linear-gradient(135deg, #7EAEFF 2.88%, #FCA6E9 100%)"),
                color("Sun", "linear-gradient(135deg, #FBDA61 2.88%, #F76B1C 98.13%)"),
            ],
            title_areas: vec![
                ratio("Small", 0.06),
                ratio("Medium", 0.18),
                ratio("Large", 0.25),
            ],
            frame_widths: vec![
                ratio("Narrow", 0.75),
                ratio("Medium", 0.85),
                ratio("Wide", 0.90),
            ],
        }
    }
}
