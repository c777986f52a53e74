// ── Core error types ──
//
// User-facing errors from ifwatch-core. Consumers never see HTTP status
// codes or JSON parse failures directly: every store-level failure is
// collapsed into `StoreUnavailable`, and the whole request fails with it.
// Too little history is not an error (see `engine::rate`).

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Caller errors ────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("{entity_type} {identifier} not found")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Store errors ─────────────────────────────────────────────────
    #[error("Sample store unavailable: {reason}")]
    StoreUnavailable {
        reason: String,
        /// HTTP status code (if the store answered at all).
        status: Option<u16>,
        /// Whether retrying the request might succeed.
        transient: bool,
    },

    #[error("Cannot load snapshot {path}: {reason}")]
    Snapshot { path: String, reason: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(entity_type: &str, identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            identifier: identifier.to_string(),
        }
    }

    /// Returns `true` for errors caused by the caller's input.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` for failures of the underlying sample store.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<ifwatch_api::Error> for CoreError {
    fn from(err: ifwatch_api::Error) -> Self {
        Self::StoreUnavailable {
            status: err.status(),
            transient: err.is_transient(),
            reason: err.to_string(),
        }
    }
}
