use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{ForgeError, ForgeResult};

/// Device family a screen slot belongs to; selects which per-family text config applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceFamily {
    /// Phones.
    Iphone,
    /// Tablets.
    Ipad,
}

/// One screenshot slot of a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenSlot {
    /// 6.9" iPhone (exported as the 6.7" store size).
    Iphone69,
    /// 6.5" iPhone.
    Iphone65,
    /// 12.9"/13" iPad, portrait.
    IpadPortrait,
    /// 12.9"/13" iPad, landscape.
    IpadLandscape,
}

impl ScreenSlot {
    /// Every slot, in export order.
    pub const ALL: [Self; 4] = [
        Self::Iphone69,
        Self::Iphone65,
        Self::IpadPortrait,
        Self::IpadLandscape,
    ];

    /// Family of this slot.
    pub fn family(self) -> DeviceFamily {
        match self {
            Self::Iphone69 | Self::Iphone65 => DeviceFamily::Iphone,
            Self::IpadPortrait | Self::IpadLandscape => DeviceFamily::Ipad,
        }
    }
}

impl fmt::Display for ScreenSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Iphone69 => "iphone69",
            Self::Iphone65 => "iphone65",
            Self::IpadPortrait => "ipad_portrait",
            Self::IpadLandscape => "ipad_landscape",
        })
    }
}

impl FromStr for ScreenSlot {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.to_string() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| ForgeError::validation(format!("unknown screen slot \"{s}\"")))
    }
}

/// Output canvas of one slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceScreen {
    /// Slot key.
    pub slot: ScreenSlot,
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Archive path of the first populated group (`iPhone/6.7-inch.png`).
    pub path: String,
    /// Preferred frame height / width.
    pub frame_aspect: f64,
}

/// Screens of every slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenTable(Vec<DeviceScreen>);

impl ScreenTable {
    /// Screen for `slot`.
    pub fn get(&self, slot: ScreenSlot) -> ForgeResult<&DeviceScreen> {
        self.0
            .iter()
            .find(|s| s.slot == slot)
            .ok_or_else(|| ForgeError::validation(format!("no screen configured for {slot}")))
    }

    /// All screens.
    pub fn iter(&self) -> impl Iterator<Item = &DeviceScreen> {
        self.0.iter()
    }

    /// Reject zero sizes, non-positive aspects and empty paths.
    pub fn validate(&self) -> ForgeResult<()> {
        for s in &self.0 {
            if s.width == 0 || s.height == 0 {
                return Err(ForgeError::validation(format!(
                    "screen {} must have non-zero dimensions",
                    s.slot
                )));
            }
            if !(s.frame_aspect.is_finite() && s.frame_aspect > 0.0) {
                return Err(ForgeError::validation(format!(
                    "screen {} frame_aspect must be > 0",
                    s.slot
                )));
            }
            if s.path.trim().is_empty() {
                return Err(ForgeError::validation(format!("screen {} has an empty path", s.slot)));
            }
        }
        Ok(())
    }
}

impl Default for ScreenTable {
    fn default() -> Self {
        let screen = |slot, width, height, path: &str, frame_aspect| DeviceScreen {
            slot,
            width,
            height,
            path: path.to_string(),
            frame_aspect,
        };
        Self(vec![
            screen(ScreenSlot::Iphone69, 1290, 2796, "iPhone/6.7-inch.png", 2.16),
            screen(ScreenSlot::Iphone65, 1284, 2778, "iPhone/6.5-inch.png", 2.16),
            screen(ScreenSlot::IpadPortrait, 2048, 2732, "iPad/portrait.png", 1.33),
            screen(ScreenSlot::IpadLandscape, 2732, 2048, "iPad/landscape.png", 0.75),
        ])
    }
}
