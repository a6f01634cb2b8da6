//! Outcome of a single access decision.

use serde::{Deserialize, Serialize};

/// Rule that produced a denial.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The guard's own configuration index, read by a non-admin, non-internal caller.
    SecurityIndex,
    /// A protected index, read without an allowed role.
    ProtectedIndex,
    /// A system index, read by an identified non-administrator.
    SystemIndex,
}

impl DenyReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SecurityIndex => "security_index",
            Self::ProtectedIndex => "protected_index",
            Self::SystemIndex => "system_index",
        }
    }
}

/// Request-scoped verdict for a search against one index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    /// Return an empty result stream.
    Deny { reason: DenyReason },
    /// Hand the stream to the document/field filter.
    Delegate { admin_or_internal: bool },
    /// Return the stream unmodified; no document filter is installed.
    Pass { admin_or_internal: bool },
}

impl AccessDecision {
    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Deny { .. })
    }

    #[must_use]
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Self::Deny { reason } => Some(*reason),
            _ => None,
        }
    }

    /// The admin-or-internal flag carried by `Delegate`/`Pass`; `None` for `Deny`.
    #[must_use]
    pub fn admin_or_internal(&self) -> Option<bool> {
        match self {
            Self::Deny { .. } => None,
            Self::Delegate { admin_or_internal } | Self::Pass { admin_or_internal } => {
                Some(*admin_or_internal)
            }
        }
    }
}
