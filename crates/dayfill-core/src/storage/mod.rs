mod config;
pub mod snapshot;

pub use config::{Config, OutputConfig};
pub use snapshot::Snapshot;

use std::path::PathBuf;

/// Returns the configuration directory.
///
/// `DAYFILL_CONFIG_DIR` wins when set. Otherwise `~/.config/dayfill/`, or
/// `~/.config/dayfill-dev/` with `DAYFILL_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("DAYFILL_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("DAYFILL_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("dayfill-dev")
            } else {
                base_dir.join("dayfill")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
