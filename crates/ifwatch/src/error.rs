//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use ifwatch_config::ConfigError;
use ifwatch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const STORE: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Sample store ─────────────────────────────────────────────────
    #[error("Sample store unavailable: {reason}{}", retry_hint(.transient))]
    #[diagnostic(
        code(ifwatch::store_unavailable),
        help(
            "Check that the sample service is running and reachable.\n\
             Use --insecure (-k) for self-signed certificates, or --snapshot <FILE> to work offline."
        )
    )]
    StoreUnavailable { reason: String, transient: bool },

    #[error("Authentication with the sample service failed")]
    #[diagnostic(
        code(ifwatch::auth_failed),
        help(
            "Verify the API key for profile '{profile}'.\n\
             Run: ifwatch config set-key --profile {profile}"
        )
    )]
    AuthFailed { profile: String },

    #[error("Cannot load snapshot {path}: {reason}")]
    #[diagnostic(
        code(ifwatch::snapshot),
        help(
            "A snapshot is a JSON object with `devices`, `interfaces`, `modules`, `samples`, and `readings` arrays."
        )
    )]
    Snapshot { path: String, reason: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(ifwatch::not_found),
        help("Run: ifwatch {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ifwatch::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(ifwatch::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: ifwatch config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No sample service configured")]
    #[diagnostic(
        code(ifwatch::no_config),
        help(
            "Create a profile with: ifwatch config init\n\
             Expected at: {path}\n\
             Or pass --store-url, or --snapshot <FILE>."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(ifwatch::config))]
    Config(#[from] ConfigError),

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    #[diagnostic(code(ifwatch::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(ifwatch::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(ifwatch::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::StoreUnavailable { .. } => exit_code::STORE,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Validation { .. } => exit_code::USAGE,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            _ => exit_code::GENERAL,
        }
    }

    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name the profile whose credentials were rejected.
    pub(crate) fn for_profile(self, name: &str) -> Self {
        match self {
            Self::AuthFailed { .. } => Self::AuthFailed {
                profile: name.into(),
            },
            other => other,
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn retry_hint(transient: &bool) -> &'static str {
    if *transient { " (retrying may succeed)" } else { "" }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidArgument { field, reason } => Self::Validation { field, reason },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => Self::NotFound {
                list_command: format!("{entity_type}s"),
                resource_type: entity_type,
                identifier,
            },

            CoreError::StoreUnavailable {
                status: Some(401 | 403),
                ..
            } => Self::AuthFailed {
                profile: "current".into(),
            },

            CoreError::StoreUnavailable {
                reason, transient, ..
            } => Self::StoreUnavailable { reason, transient },

            CoreError::Snapshot { path, reason } => Self::Snapshot { path, reason },

            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let invalid: CliError = CoreError::InvalidArgument {
            field: "limit".into(),
            reason: "must be at least 1".into(),
        }
        .into();
        assert_eq!(invalid.exit_code(), exit_code::USAGE);

        let down: CliError = CoreError::StoreUnavailable {
            reason: "connection refused".into(),
            status: None,
            transient: true,
        }
        .into();
        assert_eq!(down.exit_code(), exit_code::STORE);

        let denied: CliError = CoreError::StoreUnavailable {
            reason: "forbidden".into(),
            status: Some(403),
            transient: false,
        }
        .into();
        assert!(matches!(denied, CliError::AuthFailed { .. }));
        assert_eq!(denied.exit_code(), exit_code::AUTH);

        let missing: CliError = CoreError::NotFound {
            entity_type: "interface".into(),
            identifier: "42".into(),
        }
        .into();
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);
        assert!(missing.to_string().contains("interface '42' not found"));
    }
}
