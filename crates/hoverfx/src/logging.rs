//! Log to a file; the terminal belongs to the UI.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use color_eyre::eyre::eyre;
use hoverfx_config::Config;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
///
/// Without a log location (no data directory and nothing configured) logging
/// stays off.
pub fn init(config: &Config) -> color_eyre::Result<()> {
    let Some(path) = config.log_file() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| eyre!(err))?;

    tracing::debug!(path = %path.display(), "logging to file");
    Ok(())
}
