//! Configuration module

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use dcrm_monitor_core::constants;
use dcrm_monitor_core::{AcquisitionMode, ClassifierConfig, MonitorSettings, StreamConfig};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Interface to listen on
    pub bind_addr: IpAddr,

    /// Base URL of the classifier backend (`/predict`, `/stream`, `/health`)
    pub api_url: String,

    /// Classification request timeout in seconds
    pub classifier_timeout_secs: u64,

    /// Hardware stream request timeout in seconds
    pub stream_timeout_secs: u64,

    /// Cadence used when start is called without one
    pub default_cadence_ms: u64,

    /// Acquisition mode at startup
    pub default_mode: AcquisitionMode,

    /// Log output format (`json` or `text`)
    pub log_format: String,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup, falling back to defaults for
    /// missing or unparseable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            bind_addr: lookup("BIND_ADDR")
                .and_then(|a| a.parse().ok())
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),

            api_url: constants::api_url_from(lookup(constants::ENV_API_URL)),

            classifier_timeout_secs: constants::timeout_secs_from(
                lookup(constants::ENV_CLASSIFIER_TIMEOUT),
                constants::DEFAULT_CLASSIFIER_TIMEOUT_SECS,
            ),

            stream_timeout_secs: constants::timeout_secs_from(
                lookup(constants::ENV_STREAM_TIMEOUT),
                constants::DEFAULT_STREAM_TIMEOUT_SECS,
            ),

            default_cadence_ms: constants::cadence_ms_from(lookup(constants::ENV_DEFAULT_CADENCE)),

            default_mode: lookup("DEFAULT_MODE")
                .and_then(|m| m.parse().ok())
                .unwrap_or_default(),

            log_format: lookup("LOG_FORMAT").unwrap_or_else(|| "text".to_string()),

            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
        }
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            base_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.classifier_timeout_secs),
        }
    }

    pub fn stream_config(&self) -> StreamConfig {
        StreamConfig {
            base_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.stream_timeout_secs),
        }
    }

    /// Initial monitoring settings
    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            cadence_ms: self.default_cadence_ms,
            mode: self.default_mode,
            ..MonitorSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_addr, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.api_url, constants::DEFAULT_API_URL);
        assert_eq!(config.classifier_timeout_secs, 10);
        assert_eq!(config.stream_timeout_secs, 5);
        assert_eq!(config.default_cadence_ms, 2000);
        assert_eq!(config.default_mode, AcquisitionMode::Demo);
        assert!(!config.json_logs());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("BIND_ADDR", "127.0.0.1"),
            ("DCRM_API_URL", "http://localhost:5000/"),
            ("DEFAULT_CADENCE_MS", "500"),
            ("DEFAULT_MODE", "Hardware"),
            ("LOG_FORMAT", "JSON"),
            ("ENVIRONMENT", "production"),
        ]);
        assert_eq!(config.port, 9000);
        assert_eq!(config.bind_addr, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.api_url, "http://localhost:5000");
        assert_eq!(config.classifier_config().base_url, "http://localhost:5000");
        assert_eq!(config.stream_config().timeout, Duration::from_secs(5));

        let settings = config.monitor_settings();
        assert_eq!(settings.cadence_ms, 500);
        assert_eq!(settings.mode, AcquisitionMode::Hardware);
        assert!(config.json_logs());
        assert_eq!(config.environment, "production");
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = config_from(&[
            ("PORT", "eighty"),
            ("STREAM_TIMEOUT_SECS", "-1"),
            ("DEFAULT_CADENCE_MS", "0"),
            ("DEFAULT_MODE", "satellite"),
        ]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.stream_timeout_secs, constants::DEFAULT_STREAM_TIMEOUT_SECS);
        assert_eq!(config.default_cadence_ms, 2000);
        assert_eq!(config.default_mode, AcquisitionMode::Demo);
    }
}
