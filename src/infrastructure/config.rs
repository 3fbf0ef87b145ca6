//! Configuration infrastructure
//!
//! Typed settings for the duty-roster portal, the geocoding service and
//! logging, plus a small manager for loading and saving them as JSON in the
//! user's configuration directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tracing::info;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Duty-roster listing source settings
    pub listing: ListingConfig,

    /// Geocoding service settings
    pub geocoding: GeocodingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Settings for the duty-roster listing source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Portal search endpoint
    pub base_url: String,

    /// Browser-like user agent; the portal rejects obvious bots
    pub user_agent: String,

    /// Referer header sent alongside the user agent
    pub referer: String,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Maximum records returned per lookup when the caller gives no limit
    pub default_limit: usize,
}

/// Settings for the geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Nominatim instance base URL
    pub base_url: String,

    /// Descriptive user agent (required by Nominatim usage policy)
    pub user_agent: String,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output (daily-rotated, next to the executable)
    pub file_output: bool,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            base_url: lakbb_portal::BASE_URL.to_string(),
            user_agent: lakbb_portal::USER_AGENT.to_string(),
            referer: lakbb_portal::REFERER.to_string(),
            request_timeout_seconds: defaults::LISTING_TIMEOUT_SECONDS,
            default_limit: defaults::RESULT_LIMIT,
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: nominatim::BASE_URL.to_string(),
            user_agent: nominatim::USER_AGENT.to_string(),
            request_timeout_seconds: defaults::GEOCODE_TIMEOUT_SECONDS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console_output: true,
            file_output: false,
        }
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join("notdienst-finder");

        Ok(config_dir)
    }

    /// Create a new configuration manager pointing at the default path
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_dir()?.join("notdienst_finder_config.json");
        Ok(Self { config_path })
    }

    /// Create a manager for an explicit path (used by tests and the CLI)
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Load configuration from file, creating the default if it doesn't exist
    pub async fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            info!(
                "Configuration file not found, creating default: {:?}",
                self.config_path
            );
            let default_config = AppConfig::default();
            self.save_config(&default_config).await?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .context("Failed to read configuration file")?;

        let config: AppConfig =
            serde_json::from_str(&content).context("Configuration file contains invalid JSON")?;

        info!("Loaded configuration from: {:?}", self.config_path);
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(config_dir) = self.config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)
                    .await
                    .context("Failed to create config directory")?;
            }
        }

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        Ok(())
    }
}

/// LAK Brandenburg duty-roster portal constants
pub mod lakbb_portal {
    /// Quick-search endpoint of the portal
    pub const BASE_URL: &str = "https://lakbb-typo3.notdienst-portal.de/schnellsuche/index.php";

    /// Query parameter carrying the postal code
    pub const PARAM_SEARCH: &str = "suchbegriff";

    /// Query parameter carrying the `DD.MM.YYYY` duty date
    pub const PARAM_DATE: &str = "datum";

    /// The portal serves an error page to non-browser user agents
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

    pub const REFERER: &str = "https://www.google.com/";

    /// Region label stamped on every record from this portal
    pub const REGION_NAME: &str = "Brandenburg";
}

/// Nominatim (OpenStreetMap) geocoding constants
pub mod nominatim {
    pub const BASE_URL: &str = "https://nominatim.openstreetmap.org";

    /// Search endpoint path
    pub const SEARCH_PATH: &str = "/search";

    /// Nominatim policy requires an identifying user agent
    pub const USER_AGENT: &str = "notdienst-finder/0.2 (pharmacy duty lookup)";
}

/// Default configuration values
pub mod defaults {
    /// Default maximum number of pharmacies per lookup
    pub const RESULT_LIMIT: usize = 4;

    /// Default listing request timeout in seconds
    pub const LISTING_TIMEOUT_SECONDS: u64 = 15;

    /// Default geocoding request timeout in seconds
    pub const GEOCODE_TIMEOUT_SECONDS: u64 = 10;

    /// Apply the 08:00 morning handover rule unless told otherwise
    pub const MORNING_CHANGE: bool = true;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_real_services() {
        let config = AppConfig::default();
        assert!(config.listing.base_url.contains("notdienst-portal.de"));
        assert!(config.geocoding.base_url.contains("nominatim"));
        assert_eq!(config.listing.default_limit, 4);
        assert_eq!(config.geocoding.request_timeout_seconds, 10);
    }

    #[tokio::test]
    async fn config_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("config.json"));

        let mut config = AppConfig::default();
        config.listing.default_limit = 7;
        config.logging.level = "debug".to_string();

        manager.save_config(&config).await.unwrap();
        let loaded = manager.load_config().await.unwrap();

        assert_eq!(loaded.listing.default_limit, 7);
        assert_eq!(loaded.logging.level, "debug");
    }

    #[tokio::test]
    async fn missing_file_yields_defaults_and_creates_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let manager = ConfigManager::with_path(path.clone());

        let loaded = manager.load_config().await.unwrap();
        assert_eq!(loaded.listing.default_limit, defaults::RESULT_LIMIT);
        assert!(path.exists());
    }
}
