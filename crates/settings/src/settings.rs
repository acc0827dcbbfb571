//! Configuration system for the pet playground.
//!
//! Provides setting keys and defaults, TOML config file support with live
//! reload, and change events with the host's "affects configuration"
//! semantics.

pub mod change;
pub mod constants;
pub mod file;

pub use change::{Configuration, ConfigurationChangeEvent, SharedConfig};
pub use file::{
    config_path, ensure_config_file, ensure_config_file_at, load_config_from,
    watch_config, Config, ConfigWatcher, ExtPosition, PetsSection, WorkbenchSection,
};
