//! Centralized path management for the pet playground.
//!
//! Directories are lazily resolved and cached. The extension root can be
//! overridden with [`set_extension_dir`] before first access.

use std::path::PathBuf;
use std::sync::OnceLock;

/// Directory name used under the platform config and data roots.
pub const APP_DIR_NAME: &str = "pet-playground";

static CONFIG_DIR: OnceLock<PathBuf> = OnceLock::new();
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();
static MEDIA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// ~/.config/pet-playground (or platform equivalent)
pub fn config_dir() -> &'static PathBuf {
    CONFIG_DIR.get_or_init(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
    })
}

/// ~/.local/share/pet-playground (or platform equivalent)
pub fn data_dir() -> &'static PathBuf {
    DATA_DIR.get_or_init(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
    })
}

/// Extension root holding the renderer's `media/` assets.
///
/// Defaults to the data dir; hosts that ship assets elsewhere override it.
pub fn extension_dir() -> &'static PathBuf {
    MEDIA_DIR.get_or_init(|| data_dir().clone())
}

/// Override the extension root (must be called before first access).
///
/// Returns false when the root was already resolved.
pub fn set_extension_dir(path: PathBuf) -> bool {
    MEDIA_DIR.set(path).is_ok()
}

/// Config file path: config_dir()/config.toml
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Persisted global state (extra pets): data_dir()/global-state.json
pub fn global_state_file() -> PathBuf {
    data_dir().join("global-state.json")
}
