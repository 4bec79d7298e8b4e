//! Configuration management for `wxbrief`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::BriefingError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the briefing service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WxBriefConfig {
    /// Aviation weather data sources
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Coordinate fallback lookups
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Text generation collaborator
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Briefing defaults
    #[serde(default)]
    pub briefing: BriefingConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Aviation weather source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the raw-text METAR/TAF API
    #[serde(default = "default_data_api_url")]
    pub data_api_url: String,
    /// Station metadata and hazard data server
    #[serde(default = "default_dataserver_url")]
    pub dataserver_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_upstream_timeout")]
    pub timeout_seconds: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Geocoding fallback settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Free-text search endpoint
    #[serde(default = "default_geocoding_url")]
    pub url: String,
    /// Request timeout in seconds
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_seconds: u32,
    /// Minimum spacing between two lookups, in milliseconds
    #[serde(default = "default_geocoding_interval")]
    pub min_interval_ms: u64,
}

/// Text generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// API key; falls back to `GEMINI_API_KEY` / `GOOGLE_API_KEY`
    pub api_key: Option<String>,
    #[serde(default = "default_generation_model")]
    pub model: String,
    #[serde(default = "default_generation_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_generation_timeout")]
    pub timeout_seconds: u32,
}

/// Briefing defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BriefingConfig {
    /// METAR lookback window in hours
    #[serde(default = "default_metar_hours")]
    pub metar_hours: u32,
    /// TAF lookback window in hours
    #[serde(default = "default_taf_hours")]
    pub taf_hours: u32,
    /// SIGMET/AIRMET lookback window in hours
    #[serde(default = "default_hazard_hours")]
    pub hazard_hours: u32,
    /// Pilot profile used when the request carries none
    #[serde(default = "default_pilot_profile")]
    pub default_pilot_profile: String,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_data_api_url() -> String {
    "https://aviationweather.gov/api/data".to_string()
}

fn default_dataserver_url() -> String {
    "https://aviationweather.gov/dataserver_current/httpparam".to_string()
}

fn default_upstream_timeout() -> u32 {
    10
}

fn default_user_agent() -> String {
    format!("wxbrief/{}", env!("CARGO_PKG_VERSION"))
}

fn default_geocoding_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_geocoding_timeout() -> u32 {
    8
}

fn default_geocoding_interval() -> u64 {
    1000
}

fn default_generation_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_generation_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_generation_timeout() -> u32 {
    60
}

fn default_metar_hours() -> u32 {
    2
}

fn default_taf_hours() -> u32 {
    24
}

fn default_hazard_hours() -> u32 {
    6
}

fn default_pilot_profile() -> String {
    "VFR".to_string()
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            data_api_url: default_data_api_url(),
            dataserver_url: default_dataserver_url(),
            timeout_seconds: default_upstream_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            url: default_geocoding_url(),
            timeout_seconds: default_geocoding_timeout(),
            min_interval_ms: default_geocoding_interval(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_generation_model(),
            base_url: default_generation_base_url(),
            timeout_seconds: default_generation_timeout(),
        }
    }
}

impl Default for BriefingConfig {
    fn default() -> Self {
        Self {
            metar_hours: default_metar_hours(),
            taf_hours: default_taf_hours(),
            hazard_hours: default_hazard_hours(),
            default_pilot_profile: default_pilot_profile(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl UpstreamConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl GeocodingConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }

    #[must_use]
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

impl GenerationConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl WxBriefConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        let path = std::env::var_os("WXBRIEF_CONFIG").map(PathBuf::from);
        Self::load_from_path(path)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. WXBRIEF_SERVER__PORT=9000
        builder = builder.add_source(
            Environment::with_prefix("WXBRIEF")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WxBriefConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.apply_env_credentials();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wxbrief").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.upstream.data_api_url.is_empty() {
            self.upstream.data_api_url = default_data_api_url();
        }
        if self.upstream.dataserver_url.is_empty() {
            self.upstream.dataserver_url = default_dataserver_url();
        }
        if self.upstream.timeout_seconds == 0 {
            self.upstream.timeout_seconds = default_upstream_timeout();
        }
        if self.upstream.user_agent.is_empty() {
            self.upstream.user_agent = default_user_agent();
        }
        if self.geocoding.url.is_empty() {
            self.geocoding.url = default_geocoding_url();
        }
        if self.geocoding.timeout_seconds == 0 {
            self.geocoding.timeout_seconds = default_geocoding_timeout();
        }
        if self.generation.model.is_empty() {
            self.generation.model = default_generation_model();
        }
        if self.generation.timeout_seconds == 0 {
            self.generation.timeout_seconds = default_generation_timeout();
        }
        if self.briefing.default_pilot_profile.trim().is_empty() {
            self.briefing.default_pilot_profile = default_pilot_profile();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Pick up the generation key from the conventional variables when none is configured
    fn apply_env_credentials(&mut self) {
        if self.generation.api_key.is_none() {
            self.generation.api_key = std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("GOOGLE_API_KEY"))
                .ok()
                .filter(|key| !key.is_empty());
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.upstream.timeout_seconds > 120 {
            return Err(
                BriefingError::config("Upstream timeout cannot exceed 120 seconds").into(),
            );
        }

        if self.geocoding.timeout_seconds > 60 {
            return Err(
                BriefingError::config("Geocoding timeout cannot exceed 60 seconds").into(),
            );
        }

        if self.generation.timeout_seconds > 300 {
            return Err(
                BriefingError::config("Generation timeout cannot exceed 300 seconds").into(),
            );
        }

        let windows = [
            ("METAR", self.briefing.metar_hours),
            ("TAF", self.briefing.taf_hours),
            ("hazard", self.briefing.hazard_hours),
        ];
        for (name, hours) in windows {
            if hours == 0 || hours > 72 {
                return Err(BriefingError::config(format!(
                    "{name} lookback window must be between 1 and 72 hours"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(BriefingError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(BriefingError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("Upstream data API", &self.upstream.data_api_url),
            ("Upstream data server", &self.upstream.dataserver_url),
            ("Geocoding", &self.geocoding.url),
            ("Generation", &self.generation.base_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(BriefingError::config(format!(
                    "{name} URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WxBriefConfig::default();
        assert_eq!(
            config.upstream.data_api_url,
            "https://aviationweather.gov/api/data"
        );
        assert_eq!(config.upstream.timeout_seconds, 10);
        assert_eq!(config.geocoding.timeout_seconds, 8);
        assert_eq!(config.briefing.metar_hours, 2);
        assert_eq!(config.briefing.taf_hours, 24);
        assert_eq!(config.briefing.hazard_hours, 6);
        assert_eq!(config.briefing.default_pilot_profile, "VFR");
        assert_eq!(config.logging.level, "info");
        assert!(config.generation.api_key.is_none());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(WxBriefConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = WxBriefConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = WxBriefConfig::default();
        config.upstream.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_zero_window() {
        let mut config = WxBriefConfig::default();
        config.briefing.taf_hours = 0;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("TAF lookback"));
    }

    #[test]
    fn test_config_validation_bad_url() {
        let mut config = WxBriefConfig::default();
        config.geocoding.url = "nominatim.local/search".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Geocoding URL"));
    }

    #[test]
    fn test_apply_defaults_fills_blanks() {
        let mut config = WxBriefConfig::default();
        config.upstream.timeout_seconds = 0;
        config.briefing.default_pilot_profile = "  ".to_string();
        config.apply_defaults();
        assert_eq!(config.upstream.timeout_seconds, 10);
        assert_eq!(config.briefing.default_pilot_profile, "VFR");
    }

    #[test]
    fn test_load_from_missing_path_uses_defaults() {
        let config =
            WxBriefConfig::load_from_path(Some(PathBuf::from("/nonexistent/wxbrief.toml")))
                .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.geocoding.min_interval_ms, 1000);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = WxBriefConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("wxbrief"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
