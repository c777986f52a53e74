//! Configuration for the ifwatch CLI.
//!
//! TOML profiles, API key resolution (env + keyring + plaintext), and
//! translation to `ifwatch_core::StoreConfig` / `EngineConfig`. The CLI
//! layers its global flags on top of what this crate resolves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ifwatch_core::{EngineConfig, StoreConfig, TlsVerification};

/// Keyring service name; entries are keyed `{profile}/api-key`.
pub const KEYRING_SERVICE: &str = "ifwatch";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named sample-service profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: explicit choice, else the configured
    /// default, else `"default"`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout, seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Newest samples per interface used for average rates.
    #[serde(default = "default_sample_limit")]
    pub sample_limit: usize,

    /// Samples older than this many hours are ignored by the rankings.
    #[serde(default = "default_recency_window_hours")]
    pub recency_window_hours: u32,

    #[serde(default = "default_top_errors_limit")]
    pub top_errors_limit: usize,

    #[serde(default = "default_top_utilization_limit")]
    pub top_utilization_limit: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
            sample_limit: default_sample_limit(),
            recency_window_hours: default_recency_window_hours(),
            top_errors_limit: default_top_errors_limit(),
            top_utilization_limit: default_top_utilization_limit(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_sample_limit() -> usize {
    5
}
fn default_recency_window_hours() -> u32 {
    72
}
fn default_top_errors_limit() -> usize {
    20
}
fn default_top_utilization_limit() -> usize {
    50
}

/// A named sample-service profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Sample service base URL (e.g., "https://telemetry.example.net").
    pub store_url: String,

    /// API key (plaintext -- prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Path to custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    /// Override timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("net", "ifwatch", "ifwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("ifwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file + environment.
///
/// Nested keys are addressed with a double underscore, e.g.
/// `IFWATCH_DEFAULTS__SAMPLE_LIMIT=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("IFWATCH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve an API key from the credential chain (no CLI flag step).
///
/// `None` means the profile runs unauthenticated.
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    // 1. Profile's api_key_env → env var lookup
    if let Some(ref env_name) = profile.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/api-key")) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    profile
        .api_key
        .as_ref()
        .map(|key| SecretString::from(key.clone()))
}

// ── Translation to core configs ─────────────────────────────────────

/// Parse and validate a sample service URL.
pub fn parse_store_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "store_url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Validation {
            field: "store_url".into(),
            reason: format!("unsupported scheme '{other}', expected http or https"),
        }),
    }
}

/// Build a `StoreConfig` from a profile -- no CLI flag overrides.
pub fn profile_to_store_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<StoreConfig, ConfigError> {
    let url = parse_store_url(&profile.store_url)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(StoreConfig {
        url,
        api_key: resolve_api_key(profile, profile_name),
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
    })
}

/// Longest accepted recency window: ten years.
pub const MAX_RECENCY_WINDOW_HOURS: u32 = 24 * 366 * 10;

/// Engine tuning from the `[defaults]` table.
pub fn engine_config(defaults: &Defaults) -> Result<EngineConfig, ConfigError> {
    if defaults.sample_limit < 2 {
        return Err(ConfigError::Validation {
            field: "sample_limit".into(),
            reason: "at least 2 samples are needed to form a rate".into(),
        });
    }
    if defaults.recency_window_hours > MAX_RECENCY_WINDOW_HOURS {
        return Err(ConfigError::Validation {
            field: "recency_window_hours".into(),
            reason: format!("must be at most {MAX_RECENCY_WINDOW_HOURS}"),
        });
    }
    Ok(EngineConfig {
        sample_limit: defaults.sample_limit,
        top_errors_limit: defaults.top_errors_limit,
        top_utilization_limit: defaults.top_utilization_limit,
        ..EngineConfig::default()
    }
    .with_recency_hours(defaults.recency_window_hours))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    fn write_config(body: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), body).unwrap();
        dir
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.default_profile.as_deref(), Some("default"));
        assert_eq!(config.defaults, Defaults::default());
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn parses_profiles_and_defaults() {
        let dir = write_config(
            r#"
default_profile = "lab"

[defaults]
sample_limit = 8
recency_window_hours = 24

[profiles.lab]
store_url = "https://telemetry.lab.example"
api_key = "plain"
timeout = 5
"#,
        );
        let config = load_config_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.active_profile_name(None), "lab");
        assert_eq!(config.defaults.sample_limit, 8);
        assert_eq!(config.defaults.top_errors_limit, 20);

        let profile = config.profile("lab").unwrap();
        let store = profile_to_store_config(profile, "lab", &config.defaults).unwrap();
        assert_eq!(store.url.as_str(), "https://telemetry.lab.example/");
        assert_eq!(store.timeout, Duration::from_secs(5));
        assert_eq!(store.tls, TlsVerification::SystemDefaults);
        assert_eq!(
            store.api_key.as_ref().map(|k| k.expose_secret().to_owned()),
            Some("plain".to_owned())
        );
    }

    #[test]
    fn explicit_profile_wins_over_default() {
        let config = Config::default();
        assert_eq!(config.active_profile_name(Some("prod")), "prod");
        assert!(matches!(
            config.profile("prod"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn insecure_and_ca_cert_select_tls_mode() {
        let defaults = Defaults::default();
        let mut profile = Profile {
            store_url: "https://10.0.0.1".into(),
            ca_cert: Some(PathBuf::from("/etc/ifwatch/ca.pem")),
            ..Profile::default()
        };
        let store = profile_to_store_config(&profile, "p", &defaults).unwrap();
        assert_eq!(
            store.tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/ifwatch/ca.pem"))
        );

        profile.insecure = Some(true);
        let store = profile_to_store_config(&profile, "p", &defaults).unwrap();
        assert_eq!(store.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn rejects_bad_urls() {
        assert!(parse_store_url("not a url").is_err());
        assert!(parse_store_url("ftp://telemetry.example").is_err());
        assert!(parse_store_url("http://127.0.0.1:8080").is_ok());
    }

    #[test]
    fn engine_config_follows_defaults() {
        let defaults = Defaults {
            sample_limit: 10,
            recency_window_hours: 6,
            ..Defaults::default()
        };
        let engine = engine_config(&defaults).unwrap();
        assert_eq!(engine.sample_limit, 10);
        assert_eq!(engine.recency_window, ifwatch_core::EngineConfig::default().recency_window / 12);
    }

    #[test]
    fn engine_config_rejects_oversized_recency_window() {
        let defaults = Defaults {
            recency_window_hours: u32::MAX,
            ..Defaults::default()
        };
        let err = engine_config(&defaults).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "recency_window_hours"));

        let widest = Defaults {
            recency_window_hours: MAX_RECENCY_WINDOW_HOURS,
            ..Defaults::default()
        };
        assert!(engine_config(&widest).is_ok());
    }

    #[test]
    fn engine_config_rejects_tiny_sample_limit() {
        let defaults = Defaults {
            sample_limit: 1,
            ..Defaults::default()
        };
        assert!(engine_config(&defaults).is_err());
    }

    #[test]
    fn save_then_load_preserves_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.profiles.insert(
            "default".into(),
            Profile {
                store_url: "https://telemetry.example.net".into(),
                api_key_env: Some("IFWATCH_TEST_KEY_UNSET".into()),
                ..Profile::default()
            },
        );

        save_config_to(&config, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles, config.profiles);
    }
}
