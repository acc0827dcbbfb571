//! Theme model for the pet playground.
//!
//! Two independent inputs decide how a playground looks:
//!
//! - [`Theme`] - the scenery drawn behind the pets (user setting)
//! - [`ColorThemeKind`] - whether the host editor is light, dark or
//!   high contrast (queried from the host through [`ActiveColorTheme`])

use pet_spec::UnknownTag;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Background scenery for the playground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    None,
    Forest,
    Castle,
}

impl Theme {
    pub const ALL: &'static [Theme] = &[Theme::None, Theme::Forest, Theme::Castle];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::None => "none",
            Theme::Forest => "forest",
            Theme::Castle => "castle",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .iter()
            .copied()
            .find(|theme| theme.as_str() == s)
            .ok_or_else(|| UnknownTag {
                kind: "theme",
                value: s.to_string(),
            })
    }
}

/// Brightness class of the host's active color theme.
///
/// The numeric values are what the renderer receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorThemeKind {
    Light = 1,
    #[default]
    Dark = 2,
    HighContrast = 3,
    HighContrastLight = 4,
}

impl ColorThemeKind {
    pub fn as_number(self) -> u8 {
        self as u8
    }

    /// Guess the kind from a color theme's display name.
    ///
    /// For hosts that only expose the theme name (e.g. "Default Light+",
    /// "Default High Contrast Light"). Anything unrecognized is dark.
    pub fn from_theme_name(name: &str) -> Self {
        let name = name.to_lowercase();
        let high_contrast = name.contains("high contrast");
        let light = name.contains("light") || name.contains("latte");
        match (high_contrast, light) {
            (true, true) => Self::HighContrastLight,
            (true, false) => Self::HighContrast,
            (false, true) => Self::Light,
            (false, false) => Self::Dark,
        }
    }
}

impl fmt::Display for ColorThemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_number())
    }
}

/// Host query for the active color theme.
pub trait ActiveColorTheme {
    fn kind(&self) -> ColorThemeKind;
}

impl ActiveColorTheme for ColorThemeKind {
    fn kind(&self) -> ColorThemeKind {
        *self
    }
}
