//! CLI configuration -- thin wrapper around `ifwatch_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--store-url, --api-key, --snapshot, etc.).

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use ifwatch_core::{EngineConfig, StoreConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use ifwatch_config::{
    Config, Defaults, KEYRING_SERVICE, Profile, config_path, load_config_or_default, save_config,
};

/// Where the samples come from.
#[derive(Debug)]
pub enum Backend {
    /// A JSON snapshot file.
    Snapshot(PathBuf),
    /// The HTTP sample service.
    Service(StoreConfig),
}

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Comma-separated profile names, for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Engine tuning from `[defaults]`.
pub fn engine_config(config: &Config) -> Result<EngineConfig, CliError> {
    Ok(ifwatch_config::engine_config(&config.defaults)?)
}

/// Pick the sample source: `--snapshot` wins, then the active profile with
/// flag overrides, then bare `--store-url`.
pub fn resolve_backend(global: &GlobalOpts, config: &Config) -> Result<Backend, CliError> {
    if let Some(ref path) = global.snapshot {
        return Ok(Backend::Snapshot(path.clone()));
    }

    let profile_name = active_profile_name(global, config);

    if let Some(profile) = config.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, global, &config.defaults)
            .map(Backend::Service);
    }

    // An explicitly requested profile must exist.
    if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(config),
        });
    }

    // No profile -- build from CLI flags / env vars alone
    let url_str = global.store_url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;

    let tls = if global.insecure || config.defaults.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(Backend::Service(StoreConfig {
        url: ifwatch_config::parse_store_url(url_str)?,
        api_key: global.api_key.clone().map(SecretString::from),
        tls,
        timeout: Duration::from_secs(global.timeout.unwrap_or(config.defaults.timeout)),
    }))
}

/// Translate a `Profile` + global flags into a `StoreConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    defaults: &Defaults,
) -> Result<StoreConfig, CliError> {
    let mut store = ifwatch_config::profile_to_store_config(profile, profile_name, defaults)?;

    if let Some(ref url) = global.store_url {
        store.url = ifwatch_config::parse_store_url(url)?;
    }
    if let Some(ref key) = global.api_key {
        store.api_key = Some(SecretString::from(key.clone()));
    }
    if global.insecure {
        store.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        store.timeout = Duration::from_secs(secs);
    }

    Ok(store)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["ifwatch"];
        argv.extend_from_slice(args);
        argv.push("errors");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn lab_config() -> Config {
        let mut config = Config::default();
        config.profiles.insert(
            "default".into(),
            Profile {
                store_url: "https://telemetry.lab.example".into(),
                timeout: Some(10),
                ..Profile::default()
            },
        );
        config
    }

    #[test]
    fn snapshot_flag_wins() {
        let backend = resolve_backend(&global(&["--snapshot", "fleet.json"]), &lab_config()).unwrap();
        assert!(matches!(backend, Backend::Snapshot(p) if p == PathBuf::from("fleet.json")));
    }

    #[test]
    fn flags_override_profile() {
        let opts = global(&[
            "--store-url",
            "http://127.0.0.1:9000",
            "--timeout",
            "3",
            "-k",
        ]);
        let Backend::Service(store) = resolve_backend(&opts, &lab_config()).unwrap() else {
            panic!("expected service backend");
        };

        assert_eq!(store.url.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(store.timeout, Duration::from_secs(3));
        assert_eq!(store.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn profile_values_apply_without_flags() {
        let Backend::Service(store) = resolve_backend(&global(&[]), &lab_config()).unwrap() else {
            panic!("expected service backend");
        };
        assert_eq!(store.url.host_str(), Some("telemetry.lab.example"));
        assert_eq!(store.timeout, Duration::from_secs(10));
    }

    #[test]
    fn missing_profile_is_reported() {
        let err = resolve_backend(&global(&["--profile", "prod"]), &lab_config()).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "prod");
                assert_eq!(available, "default");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn nothing_configured_is_no_config() {
        let err = resolve_backend(&global(&[]), &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }
}
