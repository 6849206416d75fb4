//! Configuration for the tracker host.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Smallest history page the display allows.
pub const MIN_HISTORY_ROWS: usize = 5;
/// Largest history page the display allows.
pub const MAX_HISTORY_ROWS: usize = 50;

/// Top-level tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Attribution recorded on completions.
    pub user: String,
    /// Where activity and ledger files live.
    pub storage: StorageConfig,
    /// Listing and window sizes.
    pub display: DisplayConfig,
    /// Ledger archival policy.
    pub retention: RetentionConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            user: "NA".to_owned(),
            storage: StorageConfig::default(),
            display: DisplayConfig::default(),
            retention: RetentionConfig::default(),
        }
    }
}

/// File locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Data directory (None = platform default from [`crate::paths::data_dir`]).
    pub data_dir: Option<PathBuf>,
    /// Activity table file name, relative to the data directory.
    pub activities_file: String,
    /// Live ledger file name, relative to the data directory.
    pub ledger_file: String,
    /// Archived ledger file name, relative to the data directory.
    pub archive_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            activities_file: "activities.json".to_owned(),
            ledger_file: "ledger.jsonl".to_owned(),
            archive_file: "ledger.archive.jsonl".to_owned(),
        }
    }
}

impl StorageConfig {
    /// Resolved data directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(crate::paths::data_dir)
    }

    /// Full path of the activity table.
    pub fn activities_path(&self) -> PathBuf {
        self.data_dir().join(&self.activities_file)
    }

    /// Full path of the live ledger.
    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir().join(&self.ledger_file)
    }

    /// Full path of the ledger archive.
    pub fn archive_path(&self) -> PathBuf {
        self.data_dir().join(&self.archive_file)
    }
}

/// Listing sizes and look-back windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// History rows shown per activity (clamped to 5..=50).
    pub history_rows: usize,
    /// Days shown in the calendar grid, ending today.
    pub calendar_days: u32,
    /// Look-back window for completion counts.
    pub analytics_days: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            history_rows: 10,
            calendar_days: 30,
            analytics_days: 30,
        }
    }
}

impl DisplayConfig {
    /// `history_rows` clamped to the supported range.
    pub fn history_limit(&self) -> usize {
        self.history_rows.clamp(MIN_HISTORY_ROWS, MAX_HISTORY_ROWS)
    }
}

/// Ledger archival policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Archive entries older than this many days (None = keep everything live).
    pub archive_after_days: Option<u32>,
}

impl TrackerConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::TrackerError::Config(e.to_string()))
    }

    /// Load from `path` if it exists, otherwise return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> crate::error::Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::TrackerError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> PathBuf {
        crate::paths::config_file()
    }
}
