//! TOML config file support with live reload.
//!
//! Config location: `~/.config/pet-playground/config.toml`
//!
//! Values are kept as the raw strings the user wrote and coerced to typed
//! values on read, so a single bad value never discards the rest of the
//! file and never blocks rendering.

use crate::change::{ConfigurationChangeEvent, SharedConfig};
use crate::constants::{defaults, keys, settings as limits};
use pet_spec::{PetColor, PetSize, PetSpecification, PetType, UnknownTag};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use theme::{ColorThemeKind, Theme};

/// Which surface hosts the playground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtPosition {
    /// Editor tab.
    #[default]
    Panel,
    /// Sidebar view in the explorer container.
    Explorer,
}

impl ExtPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtPosition::Panel => "panel",
            ExtPosition::Explorer => "explorer",
        }
    }
}

impl fmt::Display for ExtPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtPosition {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "panel" => Ok(ExtPosition::Panel),
            "explorer" => Ok(ExtPosition::Explorer),
            other => Err(UnknownTag {
                kind: "position",
                value: other.to_string(),
            }),
        }
    }
}

/// The `[vscode-pets]` table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct PetsSection {
    pub pet_color: String,
    pub pet_type: String,
    pub pet_size: String,
    pub theme: String,
    pub position: String,
}

impl Default for PetsSection {
    fn default() -> Self {
        Self {
            pet_color: defaults::PET_COLOR.to_string(),
            pet_type: defaults::PET_TYPE.to_string(),
            pet_size: defaults::PET_SIZE.to_string(),
            theme: defaults::THEME.to_string(),
            position: defaults::POSITION.to_string(),
        }
    }
}

/// The `[workbench]` table: host-level settings the playground follows.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct WorkbenchSection {
    /// Display name of the host color theme.
    pub color_theme: String,
}

impl Default for WorkbenchSection {
    fn default() -> Self {
        Self {
            color_theme: defaults::COLOR_THEME.to_string(),
        }
    }
}

/// User-facing config parsed from TOML.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub vscode_pets: PetsSection,
    pub workbench: WorkbenchSection,
}

/// Parse `raw`, logging and returning `default` when it is not a valid value.
fn coerce<T>(key: &str, raw: &str, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!("Invalid value {:?} for {}, using '{}'", raw, key, default);
            default
        }
    }
}

impl Config {
    pub fn pet_color(&self) -> PetColor {
        coerce(keys::PET_COLOR, &self.vscode_pets.pet_color, defaults::PET_COLOR)
    }

    pub fn pet_type(&self) -> PetType {
        coerce(keys::PET_TYPE, &self.vscode_pets.pet_type, defaults::PET_TYPE)
    }

    pub fn pet_size(&self) -> PetSize {
        coerce(keys::PET_SIZE, &self.vscode_pets.pet_size, defaults::PET_SIZE)
    }

    pub fn theme(&self) -> Theme {
        coerce(keys::THEME, &self.vscode_pets.theme, defaults::THEME)
    }

    pub fn position(&self) -> ExtPosition {
        coerce(keys::POSITION, &self.vscode_pets.position, defaults::POSITION)
    }

    /// Kind of the configured host color theme.
    pub fn color_theme_kind(&self) -> ColorThemeKind {
        let name = &self.workbench.color_theme;
        if name.len() > limits::MAX_STRING_LENGTH {
            tracing::warn!(
                "{} is {} bytes long, using '{}'",
                keys::COLOR_THEME,
                name.len(),
                defaults::COLOR_THEME
            );
            return ColorThemeKind::from_theme_name(defaults::COLOR_THEME);
        }
        ColorThemeKind::from_theme_name(name)
    }

    /// Primary pet as configured, unnormalized.
    pub fn pet_specification(&self) -> PetSpecification {
        PetSpecification::new(self.pet_color(), self.pet_type(), self.pet_size())
    }

    /// Fully qualified keys whose raw value differs between `self` and `other`.
    pub fn changed_keys(&self, other: &Config) -> Vec<&'static str> {
        let a = &self.vscode_pets;
        let b = &other.vscode_pets;
        let mut changed = Vec::new();
        if a.pet_color != b.pet_color {
            changed.push(keys::PET_COLOR);
        }
        if a.pet_type != b.pet_type {
            changed.push(keys::PET_TYPE);
        }
        if a.pet_size != b.pet_size {
            changed.push(keys::PET_SIZE);
        }
        if a.theme != b.theme {
            changed.push(keys::THEME);
        }
        if a.position != b.position {
            changed.push(keys::POSITION);
        }
        if self.workbench.color_theme != other.workbench.color_theme {
            changed.push(keys::COLOR_THEME);
        }
        changed
    }
}

/// Default config file content with comments (generated on first launch).
const DEFAULT_CONFIG: &str = r#"# Pet Playground Configuration
# Changes are applied live when this file is saved.

[vscode-pets]
# Pet type: cat, clippy, crab, dog, rocky, rubberduck, snake, totoro, zappy
pet-type = "cat"

# Pet color: black, brown, green, yellow, gray, red
# Some pets only come in one color; other values are adjusted automatically.
pet-color = "brown"

# Pet size: nano, medium, large
pet-size = "nano"

# Scenery behind the pets: none, forest, castle
theme = "none"

# Where the playground lives: "panel" (editor tab) or "explorer" (sidebar)
position = "panel"

[workbench]
# Name of the editor color theme (light/dark/high contrast is derived from it)
color-theme = "Default Dark+"
"#;

/// Return the config file path.
pub fn config_path() -> PathBuf {
    pets_paths::config_file()
}

/// Ensure the config file exists, creating a default if missing.
/// Returns the path to the config file.
pub fn ensure_config_file() -> Option<PathBuf> {
    ensure_config_file_at(&config_path())
}

/// Like [`ensure_config_file`], for an explicit path.
pub fn ensure_config_file_at(path: &Path) -> Option<PathBuf> {
    if !path.exists() {
        let parent = path.parent()?;
        std::fs::create_dir_all(parent).ok()?;
        std::fs::write(path, DEFAULT_CONFIG).ok()?;
        tracing::info!("Created default config at {:?}", path);
    }
    Some(path.to_path_buf())
}

/// Load and parse a config file at `path`. Returns default on any error.
pub fn load_config_from(path: &Path) -> Config {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to read config: {}", e);
            }
            return Config::default();
        }
    };

    // Size guard
    if content.len() > limits::MAX_FILE_SIZE as usize {
        tracing::warn!(
            "Config file too large ({} bytes), using defaults",
            content.len()
        );
        return Config::default();
    }

    match toml::from_str(&content) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("Failed to parse config.toml: {}", e);
            Config::default()
        }
    }
}

/// Re-read `path` into `shared`, returning the resulting change event if
/// anything changed.
pub(crate) fn reload_into(path: &Path, shared: &SharedConfig) -> Option<ConfigurationChangeEvent> {
    let event = shared.replace(load_config_from(path));
    if event.is_empty() {
        None
    } else {
        tracing::info!("Config file changed: {:?}", event.changed_keys());
        Some(event)
    }
}

/// Debounced watcher on the config file's directory.
pub type ConfigWatcher = notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>;

/// Start watching the config file for changes.
///
/// Each reload updates `shared` and, when any key changed, sends a
/// [`ConfigurationChangeEvent`] on the returned receiver. The debouncer stops
/// watching on drop.
pub fn watch_config(
    path: PathBuf,
    shared: SharedConfig,
) -> Option<(
    ConfigWatcher,
    std::sync::mpsc::Receiver<ConfigurationChangeEvent>,
)> {
    use notify_debouncer_mini::new_debouncer;
    use std::time::Duration;

    let watch_dir = path.parent()?.to_path_buf();
    let path_clone = path.clone();

    let (tx, rx) = std::sync::mpsc::channel();

    let mut debouncer = new_debouncer(
        Duration::from_millis(100),
        move |res: Result<Vec<notify_debouncer_mini::DebouncedEvent>, _>| {
            if let Ok(events) = res {
                if events.iter().any(|event| event.path == path_clone) {
                    if let Some(change) = reload_into(&path_clone, &shared) {
                        let _ = tx.send(change);
                    }
                }
            }
        },
    )
    .ok()?;

    debouncer
        .watcher()
        .watch(&watch_dir, notify::RecursiveMode::NonRecursive)
        .ok()?;

    tracing::info!("Watching config file: {:?}", path);
    Some((debouncer, rx))
}
