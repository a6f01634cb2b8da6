//! Authorization model and the mapping of callers onto security roles.
//!
//! The model is owned by whoever manages the security configuration and is pushed
//! into the guard through [`crate::ConfigModelBus`]. Role sets are recomputed on every
//! request that needs them and never cached here.

use std::collections::{BTreeMap, BTreeSet};
use std::net::IpAddr;

use serde::Deserialize;

use crate::error::Result;
use crate::matcher::WildcardMatcher;
use crate::types::User;

/// Maps a caller onto the security roles granted by the current model.
///
/// Implementations may consult remote or cached state. Errors are surfaced to the
/// search as hard failures; they are never read as "no roles".
pub trait RoleMapper: Send + Sync {
    fn map_roles(
        &self,
        model: &AuthorizationModel,
        user: Option<&User>,
        remote_address: Option<IpAddr>,
    ) -> Result<BTreeSet<String>>;
}

/// One role and the callers it is granted to.
#[derive(Debug, Clone)]
pub struct RoleMapping {
    role: String,
    users: WildcardMatcher,
    backend_roles: WildcardMatcher,
    hosts: WildcardMatcher,
}

impl RoleMapping {
    pub fn compile<S: AsRef<str>>(
        role: impl Into<String>,
        users: &[S],
        backend_roles: &[S],
        hosts: &[S],
    ) -> Result<Self> {
        Ok(Self {
            role: role.into(),
            users: WildcardMatcher::compile(users)?,
            backend_roles: WildcardMatcher::compile(backend_roles)?,
            hosts: WildcardMatcher::compile(hosts)?,
        })
    }

    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    fn grants(&self, user: &User, remote_address: Option<&str>) -> bool {
        self.users.matches(&user.name)
            || self.backend_roles.matches_any(&user.backend_roles)
            || remote_address.is_some_and(|address| self.hosts.matches(address))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawModel {
    #[serde(default)]
    version: u64,
    #[serde(default)]
    roles_mapping: BTreeMap<String, RawRoleMapping>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRoleMapping {
    #[serde(default)]
    users: Vec<String>,
    #[serde(default)]
    backend_roles: Vec<String>,
    #[serde(default)]
    hosts: Vec<String>,
}

/// Immutable authorization model: the role mappings in force.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationModel {
    version: u64,
    mappings: Vec<RoleMapping>,
}

impl AuthorizationModel {
    #[must_use]
    pub fn new(version: u64, mappings: Vec<RoleMapping>) -> Self {
        Self { version, mappings }
    }

    /// Parse a `{"version": n, "roles_mapping": {role: {users, backend_roles, hosts}}}` document.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let parsed: RawModel = serde_json::from_str(raw)?;
        let mappings = parsed
            .roles_mapping
            .into_iter()
            .map(|(role, mapping)| {
                RoleMapping::compile(
                    role,
                    mapping.users.as_slice(),
                    mapping.backend_roles.as_slice(),
                    mapping.hosts.as_slice(),
                )
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(parsed.version, mappings))
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn mappings(&self) -> &[RoleMapping] {
        &self.mappings
    }
}

/// Default [`RoleMapper`]: grants every role whose mapping matches the caller's name,
/// one of its backend roles, or its remote address.
#[derive(Debug, Clone, Copy, Default)]
pub struct MappingRoleMapper;

impl RoleMapper for MappingRoleMapper {
    fn map_roles(
        &self,
        model: &AuthorizationModel,
        user: Option<&User>,
        remote_address: Option<IpAddr>,
    ) -> Result<BTreeSet<String>> {
        let Some(user) = user else {
            return Ok(BTreeSet::new());
        };
        let address = remote_address.map(|address| address.to_string());
        Ok(model
            .mappings
            .iter()
            .filter(|mapping| mapping.grants(user, address.as_deref()))
            .map(|mapping| mapping.role.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GuardError;

    fn model() -> AuthorizationModel {
        AuthorizationModel::from_json_str(
            r#"{
                "version": 3,
                "roles_mapping": {
                    "finance_admin": {"users": ["carol"], "backend_roles": ["cn=finance,*"]},
                    "analyst": {"users": ["*"]},
                    "ops": {"hosts": ["10.0.0.*"]}
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn absent_user_maps_to_no_roles() {
        let roles = MappingRoleMapper
            .map_roles(&model(), None, Some("10.0.0.5".parse().unwrap()))
            .unwrap();
        assert!(roles.is_empty());
    }

    #[test]
    fn roles_map_by_name_backend_role_and_host() {
        let model = model();
        assert_eq!(model.version(), 3);

        let carol = User::new("carol");
        let roles = MappingRoleMapper.map_roles(&model, Some(&carol), None).unwrap();
        assert_eq!(
            roles,
            BTreeSet::from(["analyst".to_string(), "finance_admin".to_string()])
        );

        let dave = User::new("dave").with_backend_role("cn=finance,ou=groups");
        let roles = MappingRoleMapper
            .map_roles(&model, Some(&dave), Some("10.0.0.9".parse().unwrap()))
            .unwrap();
        assert!(roles.contains("finance_admin"));
        assert!(roles.contains("ops"));

        let erin = User::new("erin");
        let roles = MappingRoleMapper
            .map_roles(&model, Some(&erin), Some("192.168.1.1".parse().unwrap()))
            .unwrap();
        assert_eq!(roles, BTreeSet::from(["analyst".to_string()]));
    }

    #[test]
    fn bad_mapping_pattern_rejects_model() {
        let err = AuthorizationModel::from_json_str(
            r#"{"roles_mapping": {"x": {"users": ["/[/"]}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, GuardError::InvalidPattern { .. }));
    }
}
