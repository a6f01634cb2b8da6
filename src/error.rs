//! Error types surfaced by `searchguard-core`.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GuardError>;

/// Failures raised while attaching a guard or deciding a search.
///
/// Denials are not errors: a denied search is a successful [`crate::AccessDecision::Deny`].
#[derive(Debug, Error)]
pub enum GuardError {
    /// A configured name pattern could not be compiled.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Settings are structurally invalid (missing or empty required values).
    #[error("invalid guard configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The role mapper could not resolve the caller's security roles.
    #[error("role mapping failed: {reason}")]
    RoleMapping { reason: String },

    /// A protected-index decision needed role mapping before any
    /// authorization model was published.
    #[error("no authorization model has been published yet")]
    ModelUnavailable,

    /// Shared guard state could not be locked.
    #[error("guard state lock failed: {0}")]
    Lock(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl GuardError {
    pub(crate) fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the error stems from configuration rather than request-time lookups.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPattern { .. } | Self::InvalidConfig { .. } | Self::Json(_) | Self::Io(_)
        )
    }
}
