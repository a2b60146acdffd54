//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section has defaults, so a missing file or a partial file is
//! fine: the dashboard still starts on the default city.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::types::Location;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub location: LocationConfig,
    pub device: DeviceConfig,
    pub providers: ProvidersConfig,
    pub ui: UiConfig,
}

/// The city shown when neither the device nor IP lookup yields a position.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LocationConfig {
    pub default_name: String,
    pub default_lat: f64,
    pub default_lon: f64,
    pub default_province: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            default_name: "济南市".to_string(),
            default_lat: 36.6512,
            default_lon: 117.1201,
            default_province: "山东".to_string(),
        }
    }
}

impl LocationConfig {
    pub fn default_location(&self) -> Location {
        Location::new(
            self.default_name.clone(),
            self.default_lat,
            self.default_lon,
            self.default_province.clone(),
        )
    }
}

/// Device positioning. A terminal has no GPS, so a fixed position can be
/// configured to stand in for it.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DeviceConfig {
    pub fixed_lat: Option<f64>,
    pub fixed_lon: Option<f64>,
    pub timeout_secs: u64,
    pub max_age_secs: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            fixed_lat: None,
            fixed_lon: None,
            timeout_secs: 8,
            max_age_secs: 300,
        }
    }
}

impl DeviceConfig {
    pub fn fixed_position(&self) -> Option<(f64, f64)> {
        self.fixed_lat.zip(self.fixed_lon)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Geo-IP providers by name, tried in this order.
    pub ip_order: Vec<String>,
    pub weather_url: String,
    pub search_url: String,
    pub search_limit: u32,
    pub user_agent: String,
    pub http_timeout_secs: u64,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            ip_order: vec!["ipapi".to_string(), "ipinfo".to_string()],
            weather_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            search_url: "https://nominatim.openstreetmap.org/search".to_string(),
            search_limit: 8,
            user_agent: "WeatherApp/1.0".to_string(),
            http_timeout_secs: 15,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    pub refresh_interval_secs: u64,
    pub debounce_ms: u64,
    pub min_query_chars: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 60,
            debounce_ms: 300,
            min_query_chars: 2,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load the file if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            info!(path, "No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        let loc = cfg.location.default_location();
        assert_eq!(loc.name, "济南市");
        assert_eq!(loc.lat, 36.6512);
        assert_eq!(loc.lon, 117.1201);
        assert_eq!(cfg.providers.ip_order, vec!["ipapi", "ipinfo"]);
        assert_eq!(cfg.ui.debounce_ms, 300);
        assert_eq!(cfg.device.timeout(), Duration::from_secs(8));
        assert!(cfg.device.fixed_position().is_none());
    }

    #[test]
    fn test_partial_file() {
        let cfg = AppConfig::parse(
            r#"
            [device]
            fixed_lat = 31.23
            fixed_lon = 121.47

            [ui]
            debounce_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(cfg.device.fixed_position(), Some((31.23, 121.47)));
        assert_eq!(cfg.device.max_age_secs, 300);
        assert_eq!(cfg.ui.debounce_ms, 500);
        assert_eq!(cfg.ui.refresh_interval_secs, 60);
        assert_eq!(cfg.location.default_name, "济南市");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let cfg = AppConfig::load_or_default("/tmp/weatherdash_no_such_config.toml").unwrap();
        assert_eq!(cfg.providers.search_limit, 8);
    }

    #[test]
    fn test_load_config() {
        let cfg = AppConfig::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml")).unwrap();
        assert_eq!(cfg.location.default_name, "济南市");
        assert_eq!(cfg.location.default_province, "山东");
        assert_eq!(cfg.providers.ip_order, ["ipapi", "ipinfo"]);
        assert_eq!(cfg.providers.search_limit, 8);
        assert!(cfg.ui.refresh_interval_secs > 0);
    }
}
