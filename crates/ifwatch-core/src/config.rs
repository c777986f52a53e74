// ── Runtime engine and store configuration ──
//
// These types describe *how* to reach the sample store and how much
// history the engine looks at. They carry credential data and tuning,
// but never touch disk. The CLI builds them and hands them in.

use std::time::Duration;

use chrono::TimeDelta;
use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed collectors).
    DangerAcceptInvalid,
}

/// Connection settings for the HTTP sample service.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Service base URL (e.g., `https://telemetry.example.net`).
    pub url: Url,
    /// API key sent as `X-API-KEY`, if the service requires one.
    pub api_key: Option<SecretString>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Tuning for the rate engine and the ranking queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Newest samples per interface fed to the average-rate computation.
    pub sample_limit: usize,
    /// Only samples this recent are considered for rankings.
    pub recency_window: TimeDelta,
    /// Default K for the error-rate ranking.
    pub top_errors_limit: usize,
    /// Default K for the utilization ranking.
    pub top_utilization_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_limit: 5,
            recency_window: TimeDelta::hours(72),
            top_errors_limit: 20,
            top_utilization_limit: 50,
        }
    }
}

impl EngineConfig {
    /// Set the recency window from whole hours.
    pub fn with_recency_hours(mut self, hours: u32) -> Self {
        self.recency_window = TimeDelta::hours(i64::from(hours));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_queries() {
        let config = EngineConfig::default();
        assert_eq!(config.sample_limit, 5);
        assert_eq!(config.top_errors_limit, 20);
        assert_eq!(config.top_utilization_limit, 50);
        assert_eq!(config.recency_window, TimeDelta::days(3));
    }

    #[test]
    fn recency_hours_override() {
        let config = EngineConfig::default().with_recency_hours(6);
        assert_eq!(config.recency_window, TimeDelta::hours(6));
    }
}
