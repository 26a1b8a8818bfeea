// ⚙️ Configuration - JMA endpoints, timeout, server address
//
// Defaults point at the public JMA endpoints. Each value can be overridden
// from the environment:
// - JMA_AREA_URL
// - JMA_FORECAST_BASE_URL
// - JMA_TIMEOUT_SECS
// - JMA_SERVER_ADDR

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_AREA_URL: &str = "https://www.jma.go.jp/bosai/common/const/area.json";
pub const DEFAULT_FORECAST_BASE_URL: &str = "https://www.jma.go.jp/bosai/forecast/data/forecast";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";

const ENV_PREFIX: &str = "JMA";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Area directory document (centers/offices)
    pub area_url: String,

    /// Forecast documents live at `<base>/<code>.json`
    pub forecast_base_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Bind address for the JSON server
    pub server_addr: String,
}

/// Flat settings as they arrive from the environment
#[derive(Debug, Deserialize)]
#[serde(default)]
struct EnvSettings {
    area_url: String,
    forecast_base_url: String,
    timeout_secs: u64,
    server_addr: String,
}

impl Default for EnvSettings {
    fn default() -> Self {
        EnvSettings {
            area_url: DEFAULT_AREA_URL.to_string(),
            forecast_base_url: DEFAULT_FORECAST_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
        }
    }
}

impl From<EnvSettings> for Config {
    fn from(settings: EnvSettings) -> Self {
        Config {
            area_url: settings.area_url,
            forecast_base_url: settings.forecast_base_url,
            timeout: Duration::from_secs(settings.timeout_secs),
            server_addr: settings.server_addr,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        EnvSettings::default().into()
    }
}

impl Config {
    /// Load from process environment
    pub fn from_env() -> Result<Self> {
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Load from an environment source; `JMA_TIMEOUT_SECS` must be whole seconds
    fn from_environment(environment: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(environment.try_parsing(true))
            .build()
            .context("Failed to build configuration")?;

        let settings = settings
            .try_deserialize::<EnvSettings>()
            .context("Failed to read JMA_* settings (JMA_TIMEOUT_SECS must be whole seconds)")?;

        Ok(settings.into())
    }

    /// Forecast URL for one area code
    pub fn forecast_url(&self, code: &str) -> String {
        format!("{}/{}.json", self.forecast_base_url.trim_end_matches('/'), code)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn environment(pairs: &[(&str, &str)]) -> config::Environment {
        let vars: config::Map<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX).source(Some(vars))
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_environment(environment(&[])).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(
            config.forecast_url("130000"),
            "https://www.jma.go.jp/bosai/forecast/data/forecast/130000.json"
        );
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_environment(environment(&[
            ("JMA_AREA_URL", "http://localhost:8080/area.json"),
            ("JMA_FORECAST_BASE_URL", "http://localhost:8080/forecast/"),
            ("JMA_TIMEOUT_SECS", "3"),
            ("JMA_SERVER_ADDR", "127.0.0.1:9000"),
        ]))
        .unwrap();

        assert_eq!(config.area_url, "http://localhost:8080/area.json");
        assert_eq!(config.forecast_url("270000"), "http://localhost:8080/forecast/270000.json");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.server_addr, "127.0.0.1:9000");
    }

    #[test]
    fn test_unrelated_variables_are_ignored() {
        let config = Config::from_environment(environment(&[
            ("HOME", "/root"),
            ("JMA_UNUSED", "x"),
        ]))
        .unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_timeout_is_an_error() {
        let result = Config::from_environment(environment(&[("JMA_TIMEOUT_SECS", "ten")]));
        assert!(result.is_err());
    }
}
