//! Logging configuration
//!
//! Loaded from a TOML file such as:
//!
//! ```toml
//! log_dir = "./logs"
//! file_name = "myapp"
//!
//! [rotation]
//! max_size_mb = 10
//! max_backups = 10
//! max_age_days = 7
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LogError, Result};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// When and how the log file is rotated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationPolicy {
    /// Size in megabytes at which the active file is rotated
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: u64,

    /// Rotated files to keep (0 keeps all)
    #[serde(default = "default_max_backups")]
    pub max_backups: usize,

    /// Days to keep rotated files (0 keeps them forever)
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u64,
}

fn default_max_size_mb() -> u64 {
    10
}

fn default_max_backups() -> usize {
    10
}

fn default_max_age_days() -> u64 {
    7
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_size_mb: default_max_size_mb(),
            max_backups: default_max_backups(),
            max_age_days: default_max_age_days(),
        }
    }
}

impl RotationPolicy {
    pub fn new(max_size_mb: u64, max_backups: usize, max_age_days: u64) -> Self {
        Self {
            max_size_mb,
            max_backups,
            max_age_days,
        }
    }

    /// Rotation threshold in bytes; a zero size falls back to the default
    pub fn max_size_bytes(&self) -> u64 {
        let mb = if self.max_size_mb == 0 {
            default_max_size_mb()
        } else {
            self.max_size_mb
        };
        mb.saturating_mul(BYTES_PER_MB)
    }
}

/// Where log files go and how they rotate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory holding the active log file and its backups
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Log file name without the `.log` extension
    #[serde(default = "default_file_name")]
    pub file_name: String,

    #[serde(default)]
    pub rotation: RotationPolicy,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("./logs")
}

/// File stem of the running executable, or `output` when it cannot be found
pub fn default_file_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "output".to_string())
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            file_name: default_file_name(),
            rotation: RotationPolicy::default(),
        }
    }
}

impl LoggingConfig {
    /// Default configuration writing into `log_dir`
    pub fn with_log_dir(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            ..Self::default()
        }
    }

    /// Load configuration from file, or return default if not found
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| LogError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content).map_err(|message| LogError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    fn from_toml(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Path of the active log file
    pub fn log_file_path(&self) -> PathBuf {
        self.log_dir.join(format!("{}.log", self.file_name))
    }
}
