mod config;
pub mod store;

pub use config::Config;
pub use store::{Store, StoreKey};

use std::path::PathBuf;

/// Returns `~/.config/habitpal[-dev]/` based on HABITPAL_ENV.
///
/// Set HABITPAL_ENV=dev to use the development data directory, or
/// HABITPAL_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("HABITPAL_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("HABITPAL_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("habitpal-dev")
            } else {
                base_dir.join("habitpal")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
