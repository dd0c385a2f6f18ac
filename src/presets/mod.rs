//! Data tables: icon sizes, device screens, screenshot styles and background presets.
//!
//! Built-in values ship with the crate; a JSON file can override any section. Sections missing
//! from the file keep their built-in values.

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{ForgeError, ForgeResult};

pub(crate) mod background;
pub(crate) mod icons;
pub(crate) mod screens;
pub(crate) mod style;

use background::BackgroundPresets;
use icons::IconTable;
use screens::ScreenTable;
use style::StylePresets;

/// Every preset table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Presets {
    /// Icon sizes per platform.
    pub icons: IconTable,
    /// Screenshot canvases per slot.
    pub screens: ScreenTable,
    /// Screenshot styling.
    pub style: StylePresets,
    /// Background generator sizes and themes.
    pub background: BackgroundPresets,
}

impl Presets {
    /// Built-in tables.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Parse overrides from a JSON reader and validate the result.
    pub fn from_reader<R: std::io::Read>(r: R) -> ForgeResult<Self> {
        let presets: Self = serde_json::from_reader(r)
            .map_err(|e| ForgeError::serde(format!("parse presets JSON: {e}")))?;
        presets.validate()?;
        Ok(presets)
    }

    /// Parse overrides from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ForgeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ForgeError::validation(format!("open presets JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Pretty JSON of every table.
    pub fn to_json(&self) -> ForgeResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ForgeError::serde(format!("serialize presets: {e}")))
    }

    /// Validate every table.
    pub fn validate(&self) -> ForgeResult<()> {
        self.icons.validate()?;
        self.screens.validate()?;
        self.style.validate()?;
        self.background.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/presets/mod.rs"]
mod tests;
