use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{ForgeError, ForgeResult},
    resize::spec::SizeSpec,
};

/// Icon target platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// iPhone / iPad app icons.
    Ios,
    /// Android launcher mipmaps.
    Android,
    /// macOS app icon PNGs.
    Macos,
    /// Favicon and PWA icons.
    Web,
}

impl Platform {
    /// Every platform, in table order.
    pub const ALL: [Self; 4] = [Self::Ios, Self::Android, Self::Macos, Self::Web];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ios => "iOS",
            Self::Android => "Android",
            Self::Macos => "macOS",
            Self::Web => "Web",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Platform {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            "macos" | "mac" => Ok(Self::Macos),
            "web" => Ok(Self::Web),
            other => Err(ForgeError::validation(format!(
                "unknown platform \"{other}\" (expected ios, android, macos or web)"
            ))),
        }
    }
}

/// Icon size table, one list of specs per platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconTable(BTreeMap<Platform, Vec<SizeSpec>>);

impl IconTable {
    /// Specs for `platform`.
    pub fn specs(&self, platform: Platform) -> ForgeResult<&[SizeSpec]> {
        self.0
            .get(&platform)
            .map(Vec::as_slice)
            .ok_or_else(|| ForgeError::validation(format!("no icon table for {platform}")))
    }

    /// Replace the table of one platform.
    pub fn set(&mut self, platform: Platform, specs: Vec<SizeSpec>) {
        self.0.insert(platform, specs);
    }

    /// Check every spec and reject empty tables.
    pub fn validate(&self) -> ForgeResult<()> {
        for (platform, specs) in &self.0 {
            if specs.is_empty() {
                return Err(ForgeError::validation(format!(
                    "icon table for {platform} is empty"
                )));
            }
            for spec in specs {
                spec.validate()?;
            }
        }
        Ok(())
    }
}

impl Default for IconTable {
    fn default() -> Self {
        let mut map = BTreeMap::new();
        map.insert(Platform::Ios, table(IOS));
        map.insert(Platform::Android, table(ANDROID));
        map.insert(Platform::Macos, table(MACOS));
        map.insert(Platform::Web, table(WEB));
        Self(map)
    }
}

fn table(rows: &[(&str, u32, &str)]) -> Vec<SizeSpec> {
    rows.iter()
        .map(|&(label, size, path)| SizeSpec {
            label: label.to_string(),
            width: size,
            height: size,
            path: path.to_string(),
        })
        .collect()
}

const IOS: &[(&str, u32, &str)] = &[
    ("iPhone 20pt @2x", 40, "iOS/Icon-App-20x20@2x.png"),
    ("iPhone 20pt @3x", 60, "iOS/Icon-App-20x20@3x.png"),
    ("iPhone 29pt @1x", 29, "iOS/Icon-App-29x29@1x.png"),
    ("iPhone 29pt @2x", 58, "iOS/Icon-App-29x29@2x.png"),
    ("iPhone 29pt @3x", 87, "iOS/Icon-App-29x29@3x.png"),
    ("iPhone 40pt @2x", 80, "iOS/Icon-App-40x40@2x.png"),
    ("iPhone 40pt @3x", 120, "iOS/Icon-App-40x40@3x.png"),
    ("iPhone 60pt @2x", 120, "iOS/Icon-App-60x60@2x.png"),
    ("iPhone 60pt @3x", 180, "iOS/Icon-App-60x60@3x.png"),
    ("iPad 76pt @1x", 76, "iOS/Icon-App-76x76@1x.png"),
    ("iPad 76pt @2x", 152, "iOS/Icon-App-76x76@2x.png"),
    ("iPad Pro 83.5pt @2x", 167, "iOS/Icon-App-83.5x83.5@2x.png"),
    ("App Store", 1024, "iOS/Icon-App-1024x1024@1x.png"),
];

const ANDROID: &[(&str, u32, &str)] = &[
    ("mdpi", 48, "mipmap-mdpi/ic_launcher.png"),
    ("hdpi", 72, "mipmap-hdpi/ic_launcher.png"),
    ("xhdpi", 96, "mipmap-xhdpi/ic_launcher.png"),
    ("xxhdpi", 144, "mipmap-xxhdpi/ic_launcher.png"),
    ("xxxhdpi", 192, "mipmap-xxxhdpi/ic_launcher.png"),
];

const MACOS: &[(&str, u32, &str)] = &[
    ("16x16", 16, "macOS/app_icon_16.png"),
    ("32x32", 32, "macOS/app_icon_32.png"),
    ("64x64", 64, "macOS/app_icon_64.png"),
    ("128x128", 128, "macOS/app_icon_128.png"),
    ("256x256", 256, "macOS/app_icon_256.png"),
    ("512x512", 512, "macOS/app_icon_512.png"),
    ("1024x1024", 1024, "macOS/app_icon_1024.png"),
];

const WEB: &[(&str, u32, &str)] = &[
    ("Favicon", 16, "web/favicon.png"),
    ("Maskable Icon", 192, "web/Icon-maskable-192.png"),
    ("Large Maskable Icon", 512, "web/Icon-maskable-512.png"),
    ("Icon", 192, "web/Icon-192.png"),
    ("Large Icon", 512, "web/Icon-512.png"),
];
