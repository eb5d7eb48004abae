//! Telemetry configuration.
//!
//! Handles loading the telemetry backend settings from environment variables
//! with sensible defaults.

use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the ingestion endpoint base URL.
pub const ENDPOINT_VAR: &str = "DUKKAN_TELEMETRY_ENDPOINT";
/// Environment variable holding the service name stamped on log entries.
pub const SERVICE_VAR: &str = "DUKKAN_SERVICE_NAME";
/// Environment variable enabling structured log delivery.
pub const LOGS_VAR: &str = "DUKKAN_TELEMETRY_LOGS";
/// Environment variable holding the HTTP timeout in milliseconds.
pub const TIMEOUT_VAR: &str = "DUKKAN_TELEMETRY_TIMEOUT_MS";

const DEFAULT_SERVICE: &str = "dukkan-web";
const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Errors raised while reading telemetry configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but its value cannot be parsed.
    #[error("Invalid value for {var}: '{value}'")]
    InvalidValue {
        /// Name of the offending variable.
        var: &'static str,
        /// The raw value.
        value: String,
    },
}

/// Telemetry backend configuration.
///
/// Configuration values can be set via environment variables:
/// - `DUKKAN_TELEMETRY_ENDPOINT`: ingestion base URL; unset means console only
/// - `DUKKAN_SERVICE_NAME`: service name on log entries (default: "dukkan-web")
/// - `DUKKAN_TELEMETRY_LOGS`: ship structured logs instead of breadcrumbs (default: false)
/// - `DUKKAN_TELEMETRY_TIMEOUT_MS`: HTTP request timeout (default: 5000)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Ingestion endpoint base URL.
    pub endpoint: Option<String>,
    /// Service name stamped on log entries.
    pub service: String,
    /// Whether the backend exposes structured logging.
    pub enable_logs: bool,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl TelemetryConfig {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `DUKKAN_TELEMETRY_LOGS` is set but is not a boolean
    /// - `DUKKAN_TELEMETRY_TIMEOUT_MS` is set but is not a number
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Creates a configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`TelemetryConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup(ENDPOINT_VAR)
            .map(|e| e.trim().trim_end_matches('/').to_string())
            .filter(|e| !e.is_empty());

        let service = lookup(SERVICE_VAR)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE.to_string());

        let enable_logs = lookup(LOGS_VAR)
            .map(|v| parse_bool(LOGS_VAR, &v))
            .transpose()?
            .unwrap_or(false);

        let timeout_ms = lookup(TIMEOUT_VAR)
            .map(|v| {
                v.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                    var: TIMEOUT_VAR,
                    value: v.clone(),
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Ok(Self {
            endpoint,
            service,
            enable_logs,
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// Sets the ingestion endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into().trim_end_matches('/').to_string());
        self
    }

    /// Enables or disables structured log delivery.
    #[must_use]
    pub fn with_logs(mut self, enable_logs: bool) -> Self {
        self.enable_logs = enable_logs;
        self
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            service: DEFAULT_SERVICE.to_string(),
            enable_logs: false,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = TelemetryConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, TelemetryConfig::default());
        assert!(config.endpoint.is_none());
        assert_eq!(config.service, "dukkan-web");
        assert!(!config.enable_logs);
        assert_eq!(config.timeout, Duration::from_millis(5000));
    }

    #[test]
    fn test_reads_all_values() {
        let config = TelemetryConfig::from_lookup(lookup(&[
            (ENDPOINT_VAR, "https://telemetry.example.com/"),
            (SERVICE_VAR, "storefront"),
            (LOGS_VAR, "true"),
            (TIMEOUT_VAR, "250"),
        ]))
        .unwrap();

        assert_eq!(
            config.endpoint.as_deref(),
            Some("https://telemetry.example.com")
        );
        assert_eq!(config.service, "storefront");
        assert!(config.enable_logs);
        assert_eq!(config.timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_blank_endpoint_is_ignored() {
        let config = TelemetryConfig::from_lookup(lookup(&[(ENDPOINT_VAR, "  ")])).unwrap();
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn test_invalid_bool() {
        let result = TelemetryConfig::from_lookup(lookup(&[(LOGS_VAR, "maybe")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { var: LOGS_VAR, .. })
        ));
    }

    #[test]
    fn test_invalid_timeout() {
        let result = TelemetryConfig::from_lookup(lookup(&[(TIMEOUT_VAR, "soon")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { var: TIMEOUT_VAR, .. })
        ));
    }
}
