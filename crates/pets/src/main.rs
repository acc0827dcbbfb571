//! Pet playground - headless host
//!
//! Drives the playground from stdin and prints renderer traffic to stdout.

mod session;
mod stdio;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use session::{ConfigSource, Session};
use settings::{ConfigWatcher, SharedConfig};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use stdio::{Console, Input};
use storage::JsonFileMemento;
use tracing::{debug, error, info, warn};

/// Application startup time for performance monitoring
static STARTUP_TIME: Lazy<Instant> = Lazy::new(Instant::now);

/// Environment variable naming the directory that holds `media/`.
const EXTENSION_DIR_VAR: &str = "PETS_EXTENSION_DIR";

/// An extension root given through the environment. Empty means unset.
fn extension_dir_override(value: Option<OsString>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Initialize required directories (cross-platform).
fn init_paths() -> Result<()> {
    if let Some(dir) = extension_dir_override(std::env::var_os(EXTENSION_DIR_VAR)) {
        debug!("Using extension dir from {}: {:?}", EXTENSION_DIR_VAR, dir);
        pets_paths::set_extension_dir(dir);
    }

    let config_dir = pets_paths::config_dir();
    let data_dir = pets_paths::data_dir();

    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    debug!(
        "Initialized paths - config: {:?}, data: {:?}",
        config_dir, data_dir
    );
    Ok(())
}

/// Check if debug mode is enabled via environment variable.
fn is_debug_mode() -> bool {
    std::env::var("PETS_DEBUG").is_ok()
}

/// Initialize the logging system. Logs go to stderr; stdout carries output.
fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_filter = if is_debug_mode() {
        "pets=trace,playground=trace,surface=trace,settings=debug,storage=debug,info"
    } else {
        "pets=info,playground=info,warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();

    info!("Pet playground v{} starting up", env!("CARGO_PKG_VERSION"));
}

/// Open the global state store. An unreadable file starts an empty store.
fn open_state_store(path: &Path) -> JsonFileMemento {
    JsonFileMemento::open_or_empty(path)
}

/// Open the persisted state and configuration.
fn open_session() -> Result<(Session, Option<ConfigWatcher>)> {
    let memento = open_state_store(&pets_paths::global_state_file());

    let config_path =
        settings::ensure_config_file().context("Failed to create default config file")?;
    let shared = SharedConfig::new(settings::load_config_from(&config_path));

    let (watcher, changes) = match settings::watch_config(config_path.clone(), shared.clone()) {
        Some((debouncer, changes)) => (Some(debouncer), Some(changes)),
        None => {
            warn!("Config file watcher unavailable, use reload-config to apply edits");
            (None, None)
        }
    };

    let session = Session::new(
        pets_paths::extension_dir().clone(),
        Arc::new(memento),
        ConfigSource {
            path: config_path,
            shared,
            changes,
        },
        Input::stdin(),
        Console::stdout(),
    );
    Ok((session, watcher))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _ = *STARTUP_TIME;

    init_logging();

    if let Err(e) = init_paths() {
        error!("Failed to initialize paths: {}", e);
    }

    let (mut session, _watcher) = open_session()?;
    info!("Session ready in {:?}", STARTUP_TIME.elapsed());

    session.run().await;
    info!("Session ended after {:?}", STARTUP_TIME.elapsed());
    Ok(())
}
