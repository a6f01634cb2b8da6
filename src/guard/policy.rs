//! Immutable compiled policy for one index attachment.

use crate::error::Result;
use crate::matcher::WildcardMatcher;
use crate::types::GuardSettings;

/// Policy switches and name matchers read on every decision.
///
/// Built once per attachment and never mutated; a reload replaces the whole snapshot.
#[derive(Debug, Clone)]
pub struct PolicySnapshot {
    security_index_name: String,
    protected_indices: WildcardMatcher,
    allowed_roles: WildcardMatcher,
    protected_indices_enabled: bool,
    system_indices: WildcardMatcher,
    system_indices_enabled: bool,
}

impl PolicySnapshot {
    /// Compile settings into a snapshot. Malformed patterns fail the whole build.
    pub fn from_settings(settings: &GuardSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            security_index_name: settings.security_index_name.clone(),
            protected_indices: WildcardMatcher::compile(&settings.protected_indices)?,
            allowed_roles: WildcardMatcher::compile(&settings.protected_indices_roles)?,
            protected_indices_enabled: settings.protected_indices_enabled,
            system_indices: WildcardMatcher::compile(&settings.system_indices)?,
            system_indices_enabled: settings.system_indices_enabled,
        })
    }

    #[must_use]
    pub fn security_index_name(&self) -> &str {
        &self.security_index_name
    }

    #[must_use]
    pub fn is_security_index(&self, index: &str) -> bool {
        index == self.security_index_name
    }

    #[must_use]
    pub fn protected_indices(&self) -> &WildcardMatcher {
        &self.protected_indices
    }

    #[must_use]
    pub fn allowed_roles(&self) -> &WildcardMatcher {
        &self.allowed_roles
    }

    #[must_use]
    pub fn protected_indices_enabled(&self) -> bool {
        self.protected_indices_enabled
    }

    #[must_use]
    pub fn system_indices(&self) -> &WildcardMatcher {
        &self.system_indices
    }

    #[must_use]
    pub fn system_indices_enabled(&self) -> bool {
        self.system_indices_enabled
    }
}
