//! Configuration keys, transport header names and policy defaults.

/// Index holding the guard's own configuration, credentials and role material.
pub const DEFAULT_SECURITY_INDEX: &str = ".security";

/// Protected-index policy is off unless explicitly enabled.
pub const PROTECTED_INDICES_ENABLED_DEFAULT: bool = false;
/// System-index policy is off unless explicitly enabled.
pub const SYSTEM_INDICES_ENABLED_DEFAULT: bool = false;

/// Transport header set by the guard's own configuration-reload requests.
pub const CONF_REQUEST_HEADER: &str = "_security_conf_request";
/// Value of [`CONF_REQUEST_HEADER`] that marks a request as internal.
pub const CONF_REQUEST_HEADER_TRUE: &str = "true";

/// Pattern that matches every name.
pub const MATCH_ALL_PATTERN: &str = "*";
