//! Request-scoped caller context passed explicitly into every decision.

use std::collections::BTreeMap;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::constants::{CONF_REQUEST_HEADER, CONF_REQUEST_HEADER_TRUE};

/// Authenticated caller attached to a request.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Default)]
pub struct User {
    /// Distinguishing name used for administrator recognition and role mapping.
    pub name: String,
    /// Roles asserted by the authentication backend (LDAP groups, JWT claims, ...).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub backend_roles: Vec<String>,
}

impl User {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            backend_roles: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_backend_role<S: Into<String>>(mut self, role: S) -> Self {
        self.backend_roles.push(role.into());
        self
    }
}

/// Channel a request arrived on. Transport headers are only trusted off the REST layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestOrigin {
    /// Originated inside this node.
    #[default]
    Direct,
    InterCluster,
    TrustedCluster,
    /// Client request received over HTTP.
    Rest,
}

impl RequestOrigin {
    fn trusts_headers(self) -> bool {
        !matches!(self, Self::Rest)
    }
}

/// Identity, address and headers of the search being decided.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Default)]
pub struct RequestContext {
    /// `None` means no identity is attached (internal or plugin-originated call).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_address: Option<IpAddr>,
    #[serde(default)]
    pub origin: RequestOrigin,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl RequestContext {
    /// Context with no identity, address or headers.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn for_user(user: User) -> Self {
        Self {
            user: Some(user),
            ..Self::default()
        }
    }

    /// Context carrying the internal configuration-request marker.
    #[must_use]
    pub fn internal_config_request() -> Self {
        Self::default().with_header(CONF_REQUEST_HEADER, CONF_REQUEST_HEADER_TRUE)
    }

    #[must_use]
    pub fn with_remote_address(mut self, address: IpAddr) -> Self {
        self.remote_address = Some(address);
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: RequestOrigin) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Header value, unless the request came over REST where headers are client-controlled.
    #[must_use]
    pub fn safe_header(&self, name: &str) -> Option<&str> {
        if name.is_empty() || !self.origin.trusts_headers() {
            return None;
        }
        self.headers.get(name).map(String::as_str)
    }

    /// Whether the internal trust marker is present as a safe header.
    #[must_use]
    pub fn is_internal_config_request(&self) -> bool {
        self.safe_header(CONF_REQUEST_HEADER) == Some(CONF_REQUEST_HEADER_TRUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conf_header_is_honored_off_rest() {
        let ctx = RequestContext::internal_config_request();
        assert!(ctx.is_internal_config_request());
        let ctx = ctx.with_origin(RequestOrigin::InterCluster);
        assert!(ctx.is_internal_config_request());
    }

    #[test]
    fn conf_header_is_ignored_over_rest() {
        let ctx = RequestContext::internal_config_request().with_origin(RequestOrigin::Rest);
        assert!(!ctx.is_internal_config_request());
        assert_eq!(ctx.safe_header(CONF_REQUEST_HEADER), None);
    }

    #[test]
    fn conf_header_requires_exact_value() {
        let ctx = RequestContext::anonymous().with_header(CONF_REQUEST_HEADER, "TRUE");
        assert!(!ctx.is_internal_config_request());
    }

    #[test]
    fn context_deserializes_with_defaults() {
        let ctx: RequestContext =
            serde_json::from_str(r#"{"user": {"name": "alice"}, "remote_address": "10.0.0.7"}"#)
                .unwrap();
        assert_eq!(ctx.user.as_ref().map(|u| u.name.as_str()), Some("alice"));
        assert_eq!(ctx.origin, RequestOrigin::Direct);
        assert_eq!(ctx.remote_address, Some("10.0.0.7".parse().unwrap()));
    }
}
