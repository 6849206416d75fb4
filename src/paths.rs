//! Application directory paths.
//!
//! Uses the [`dirs`] crate for platform-appropriate locations.
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | Data | `~/Library/Application Support/sukhii/` | `~/.local/share/sukhii/` |
//! | Config | `~/Library/Application Support/sukhii/` | `~/.config/sukhii/` |
//!
//! # Environment Overrides
//!
//! - `SUKHII_DATA_DIR` overrides [`data_dir`]
//! - `SUKHII_CONFIG_DIR` overrides [`config_dir`]

use std::path::PathBuf;

/// Data root holding the activity table and ledger files.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("SUKHII_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("sukhii"))
        .unwrap_or_else(|| PathBuf::from("/tmp/sukhii-data"))
}

/// Config directory holding `config.toml`.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("SUKHII_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("sukhii"))
        .unwrap_or_else(|| PathBuf::from("/tmp/sukhii-config"))
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}
