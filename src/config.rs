//! Configuration management module.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub attendance: AttendanceConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Attendance backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Bearer token sent with every request. Empty means anonymous.
    #[serde(default)]
    pub token: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Attendance table and employee view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceConfig {
    /// Rows per page in the HR attendance table.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Length of the initial date range, counted back from today.
    #[serde(default = "default_range_days")]
    pub default_range_days: i64,
    /// Employee the "My Attendance" view acts for.
    #[serde(default)]
    pub employee_id: Option<String>,
}

fn default_page_size() -> usize {
    7
}

fn default_range_days() -> i64 {
    30
}

/// Panel shown after startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartPanel {
    #[default]
    Dashboard,
    Employee,
    Hr,
}

/// UI preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub start_panel: StartPanel,
}

impl AppConfig {
    /// Platform config path, falling back to the executable directory.
    pub fn default_path() -> PathBuf {
        if let Some(dirs) = ProjectDirs::from("com", "Gianged", "hr-attendance") {
            return dirs.config_dir().join("config.toml");
        }

        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Directory for the rolling log files.
    pub fn log_dir() -> PathBuf {
        ProjectDirs::from("com", "Gianged", "hr-attendance")
            .map(|dirs| dirs.data_local_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Parse and validate config file contents.
    pub fn parse(content: &str) -> ConfigLoadResult {
        match toml::from_str::<AppConfig>(content) {
            Ok(config) => match config.validate() {
                Ok(()) => ConfigLoadResult::Loaded(config),
                Err(e) => ConfigLoadResult::Invalid(e),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("API base URL cannot be empty".to_string()));
        }
        if !self.api.base_url.starts_with("http") {
            return Err(ConfigError::Validation(
                "API base URL must start with http:// or https://".to_string(),
            ));
        }
        if self.api.timeout_secs < 1 {
            return Err(ConfigError::Validation(
                "API timeout must be at least 1 second".to_string(),
            ));
        }
        if self.attendance.page_size < 1 {
            return Err(ConfigError::Validation("Page size must be at least 1".to_string()));
        }
        if self.attendance.page_size > 100 {
            return Err(ConfigError::Validation("Page size cannot exceed 100".to_string()));
        }
        if self.attendance.default_range_days < 1 {
            return Err(ConfigError::Validation("Date range must be at least 1 day".to_string()));
        }
        if self.attendance.default_range_days > 366 {
            return Err(ConfigError::Validation("Date range cannot exceed 366 days".to_string()));
        }
        if let Some(id) = &self.attendance.employee_id
            && id.trim().is_empty()
        {
            return Err(ConfigError::Validation("Employee ID cannot be blank".to_string()));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl ApiConfig {
    /// Base URL without a trailing slash.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            default_range_days: default_range_days(),
            employee_id: None,
        }
    }
}
