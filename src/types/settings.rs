//! Guard configuration surface with documented defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_SECURITY_INDEX, PROTECTED_INDICES_ENABLED_DEFAULT, SYSTEM_INDICES_ENABLED_DEFAULT,
};
use crate::error::{GuardError, Result};

fn default_security_index_name() -> String {
    DEFAULT_SECURITY_INDEX.to_string()
}

fn default_protected_indices_enabled() -> bool {
    PROTECTED_INDICES_ENABLED_DEFAULT
}

fn default_system_indices_enabled() -> bool {
    SYSTEM_INDICES_ENABLED_DEFAULT
}

/// Settings read when a guard attaches to an index service.
///
/// Every field is optional in serialized form; missing values take the documented
/// defaults. Kebab-case spellings (`protected-indices-enabled`) are accepted as aliases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GuardSettings {
    /// Name of the index holding the guard's own configuration.
    #[serde(default = "default_security_index_name", alias = "security-index-name")]
    pub security_index_name: String,
    /// Patterns naming indices subject to the role allow-list.
    #[serde(default, alias = "protected-indices")]
    pub protected_indices: Vec<String>,
    /// Role patterns allowed to read protected indices.
    #[serde(default, alias = "protected-indices-roles")]
    pub protected_indices_roles: Vec<String>,
    #[serde(
        default = "default_protected_indices_enabled",
        alias = "protected-indices-enabled"
    )]
    pub protected_indices_enabled: bool,
    /// Patterns naming indices reserved for internal operational use.
    #[serde(default, alias = "system-indices")]
    pub system_indices: Vec<String>,
    #[serde(
        default = "default_system_indices_enabled",
        alias = "system-indices-enabled"
    )]
    pub system_indices_enabled: bool,
    /// Distinguished names recognized as administrators.
    #[serde(default, alias = "admin-dn")]
    pub admin_dn: Vec<String>,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            security_index_name: default_security_index_name(),
            protected_indices: Vec::new(),
            protected_indices_roles: Vec::new(),
            protected_indices_enabled: default_protected_indices_enabled(),
            system_indices: Vec::new(),
            system_indices_enabled: default_system_indices_enabled(),
            admin_dn: Vec::new(),
        }
    }
}

impl GuardSettings {
    /// Start a fluent builder for `GuardSettings`.
    #[must_use]
    pub fn builder() -> GuardSettingsBuilder {
        GuardSettingsBuilder::default()
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs_err::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    /// Structural checks that do not require compiling patterns.
    pub fn validate(&self) -> Result<()> {
        if self.security_index_name.trim().is_empty() {
            return Err(GuardError::InvalidConfig {
                reason: "security_index_name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GuardSettingsBuilder {
    inner: GuardSettings,
}

impl GuardSettingsBuilder {
    pub fn security_index_name<S: Into<String>>(mut self, name: S) -> Self {
        self.inner.security_index_name = name.into();
        self
    }

    pub fn protected_index<S: Into<String>>(mut self, pattern: S) -> Self {
        self.inner.protected_indices.push(pattern.into());
        self
    }

    pub fn protected_indices_role<S: Into<String>>(mut self, pattern: S) -> Self {
        self.inner.protected_indices_roles.push(pattern.into());
        self
    }

    #[must_use]
    pub fn protected_indices_enabled(mut self, enabled: bool) -> Self {
        self.inner.protected_indices_enabled = enabled;
        self
    }

    pub fn system_index<S: Into<String>>(mut self, pattern: S) -> Self {
        self.inner.system_indices.push(pattern.into());
        self
    }

    #[must_use]
    pub fn system_indices_enabled(mut self, enabled: bool) -> Self {
        self.inner.system_indices_enabled = enabled;
        self
    }

    pub fn admin_dn<S: Into<String>>(mut self, dn: S) -> Self {
        self.inner.admin_dn.push(dn.into());
        self
    }

    #[must_use]
    pub fn build(self) -> GuardSettings {
        self.inner
    }
}
