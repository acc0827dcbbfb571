//! Configuration snapshots and change notifications.

use crate::file::Config;
use parking_lot::RwLock;
use std::sync::Arc;
use theme::{ActiveColorTheme, ColorThemeKind};

/// Which settings changed in one update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationChangeEvent {
    changed: Vec<String>,
}

impl ConfigurationChangeEvent {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            changed: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `section` was touched by this change.
    ///
    /// A changed key `a.b` affects `a.b` itself, its parent `a`, and any
    /// child such as `a.b.c`.
    pub fn affects_configuration(&self, section: &str) -> bool {
        self.changed.iter().any(|key| {
            key == section || is_child_of(key, section) || is_child_of(section, key)
        })
    }

    pub fn changed_keys(&self) -> &[String] {
        &self.changed
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

fn is_child_of(key: &str, section: &str) -> bool {
    key.len() > section.len()
        && key.starts_with(section)
        && key.as_bytes()[section.len()] == b'.'
}

/// Reader for the current configuration.
pub trait Configuration {
    fn snapshot(&self) -> Config;
}

impl Configuration for Config {
    fn snapshot(&self) -> Config {
        self.clone()
    }
}

/// Configuration shared between the file watcher and its readers.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<Config>>,
}

impl SharedConfig {
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Swap in `config` and report what changed.
    pub fn replace(&self, config: Config) -> ConfigurationChangeEvent {
        let mut current = self.inner.write();
        let changed = current.changed_keys(&config);
        *current = config;
        ConfigurationChangeEvent::new(changed)
    }

    /// Edit the configuration in place and report what changed.
    pub fn update(&self, edit: impl FnOnce(&mut Config)) -> ConfigurationChangeEvent {
        let mut next = self.snapshot();
        edit(&mut next);
        self.replace(next)
    }
}

impl Configuration for SharedConfig {
    fn snapshot(&self) -> Config {
        self.inner.read().clone()
    }
}

impl ActiveColorTheme for SharedConfig {
    fn kind(&self) -> ColorThemeKind {
        self.inner.read().color_theme_kind()
    }
}
