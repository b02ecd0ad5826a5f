//! Configuration management for vaultbank
//!
//! This module handles loading, validation, and management of
//! vaultbank configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigErrorSeverity, ConfigResult};

// ==================== Configuration Types ====================

/// Remote banking API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Scheme and host of the backend
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path every API route lives under
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            path_prefix: default_path_prefix(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://react-bank-project.eapi.joincoded.com".to_string()
}

fn default_path_prefix() -> String {
    "/mini-project/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Local session storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// File holding the persisted token and remember-me flag
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./vaultbank-session.json")
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Maximum number of records materialized at once
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Scroll offset below which the previous page is pulled back in
    #[serde(default = "default_scroll_threshold")]
    pub scroll_threshold: f64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            scroll_threshold: default_scroll_threshold(),
        }
    }
}

fn default_page_size() -> usize {
    50
}

fn default_scroll_threshold() -> f64 {
    200.0
}

/// Balance screen settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// How many recent transactions to list under the balance
    #[serde(default = "default_recent_count")]
    pub recent_count: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_count: default_recent_count(),
        }
    }
}

fn default_recent_count() -> usize {
    3
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Badge shown next to amounts
    #[serde(default = "default_currency_label")]
    pub label: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
    /// Decimal separator
    #[serde(default = "default_decimal_sep")]
    pub decimal_separator: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            label: default_currency_label(),
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_sep(),
            decimal_separator: default_decimal_sep(),
        }
    }
}

fn default_currency_label() -> String {
    "KWD".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

fn default_decimal_sep() -> String {
    ".".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Session storage settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Balance screen settings
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            message: e.to_string(),
        })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config =
            serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
                message: e.to_string(),
            })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "api.base_url".to_string(),
            });
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                reason: "Base URL must start with http:// or https://".to_string(),
            });
        }

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_secs".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if self.pagination.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.page_size".to_string(),
                reason: "Page size must be greater than 0".to_string(),
            });
        }

        if !(self.pagination.scroll_threshold >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "pagination.scroll_threshold".to_string(),
                reason: "Scroll threshold must be a non-negative number".to_string(),
            });
        }

        if self.currency.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "currency.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Full URL of an API route, e.g. `endpoint("/auth/me")`
    pub fn endpoint(&self, route: &str) -> String {
        format!(
            "{}/{}/{}",
            self.api.base_url.trim_end_matches('/'),
            self.api.path_prefix.trim_matches('/'),
            route.trim_start_matches('/')
        )
    }

    /// Absolute URL for a profile image path returned by the backend
    pub fn image_url(&self, image: &str) -> String {
        if image.starts_with("http") {
            image.to_string()
        } else {
            format!(
                "{}/{}",
                self.api.base_url.trim_end_matches('/'),
                image.trim_start_matches('/')
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.pagination.page_size, 50);
        assert_eq!(config.pagination.scroll_threshold, 200.0);
        assert_eq!(config.dashboard.recent_count, 3);
        assert_eq!(config.currency.decimal_places, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generated_default_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.api.path_prefix, "/mini-project/api");
        assert_eq!(config.currency.label, "KWD");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml("pagination:\n  page_size: 20\n").unwrap();
        assert_eq!(config.pagination.page_size, 20);
        assert_eq!(config.pagination.scroll_threshold, 200.0);
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_invalid_page_size() {
        let err = Config::from_yaml("pagination:\n  page_size: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "pagination.page_size"));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("api: [unclosed").unwrap_err();
        assert_eq!(err.code(), error::ConfigErrorCode::InvalidYaml);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/vaultbank.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api:\n  base_url: \"http://localhost:8000\"").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let config = Config::default();
        assert_eq!(
            config.endpoint("/auth/me"),
            "https://react-bank-project.eapi.joincoded.com/mini-project/api/auth/me"
        );
        assert_eq!(
            config.endpoint("transactions/my"),
            "https://react-bank-project.eapi.joincoded.com/mini-project/api/transactions/my"
        );
    }

    #[test]
    fn test_image_url() {
        let config = Config::default();
        assert_eq!(
            config.image_url("media/a.jpg"),
            "https://react-bank-project.eapi.joincoded.com/media/a.jpg"
        );
        assert_eq!(config.image_url("https://cdn.x/a.jpg"), "https://cdn.x/a.jpg");
    }
}
