//! Request-time access decisions for searches against an index.
//!
//! Rules run in a fixed order and the first denial wins:
//! 1. the security index is readable only by administrators and internal requests;
//! 2. protected indices (when enabled) require a mapped role on the allow-list;
//! 3. system indices (when enabled) are closed to identified non-administrators.
//!
//! Anything left over is handed to the document filter, or passed through when none
//! is installed. A decision works on one immutable view of the guard state; reloads
//! replace that view as a whole.

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

use tracing::{debug, error, instrument, warn};

use crate::error::{GuardError, Result};
use crate::guard::admin::AdminCheck;
use crate::guard::bus::ConfigModelListener;
use crate::guard::filter::{DocumentFilter, ResultStream};
use crate::guard::policy::PolicySnapshot;
use crate::guard::roles::{AuthorizationModel, RoleMapper};
use crate::types::{AccessDecision, DenyReason, GuardSettings, RequestContext};

/// Everything a decision reads, swapped as one unit.
#[derive(Debug)]
struct GuardState {
    snapshot: Arc<PolicySnapshot>,
    model: Option<Arc<AuthorizationModel>>,
}

/// Decides whether a search may read an index, and how its results are narrowed.
pub struct AccessDecisionEngine<R: ResultStream> {
    state: RwLock<Arc<GuardState>>,
    admin: Arc<dyn AdminCheck>,
    roles: Arc<dyn RoleMapper>,
    filter: Option<Arc<dyn DocumentFilter<R>>>,
}

impl<R: ResultStream> AccessDecisionEngine<R> {
    /// Compile `settings` and attach. Malformed configuration fails the attachment.
    pub fn attach(
        settings: &GuardSettings,
        admin: Arc<dyn AdminCheck>,
        roles: Arc<dyn RoleMapper>,
    ) -> Result<Self> {
        let snapshot = PolicySnapshot::from_settings(settings)?;
        Ok(Self {
            state: RwLock::new(Arc::new(GuardState {
                snapshot: Arc::new(snapshot),
                model: None,
            })),
            admin,
            roles,
            filter: None,
        })
    }

    /// Install the document/field filter; allowed searches are then delegated to it.
    #[must_use]
    pub fn with_document_filter(mut self, filter: Arc<dyn DocumentFilter<R>>) -> Self {
        self.filter = Some(filter);
        self
    }

    fn current(&self) -> Result<Arc<GuardState>> {
        let state = self
            .state
            .read()
            .map_err(|_| GuardError::Lock("guard state poisoned".to_string()))?;
        Ok(Arc::clone(&state))
    }

    fn swap(&self, update: impl FnOnce(&GuardState) -> GuardState) -> Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| GuardError::Lock("guard state poisoned".to_string()))?;
        let next = update(&state);
        *state = Arc::new(next);
        Ok(())
    }

    /// Policy snapshot currently in force.
    pub fn snapshot(&self) -> Result<Arc<PolicySnapshot>> {
        Ok(Arc::clone(&self.current()?.snapshot))
    }

    /// Authorization model currently in force, if one has been published.
    pub fn model(&self) -> Result<Option<Arc<AuthorizationModel>>> {
        Ok(self.current()?.model.clone())
    }

    /// Rebuild the policy snapshot from new settings. On error the old snapshot stays.
    #[instrument(level = "debug", skip_all, fields(security_index = %settings.security_index_name))]
    pub fn reload_settings(&self, settings: &GuardSettings) -> Result<()> {
        let snapshot = Arc::new(PolicySnapshot::from_settings(settings)?);
        self.swap(|current| GuardState {
            snapshot,
            model: current.model.clone(),
        })?;
        debug!("policy snapshot replaced");
        Ok(())
    }

    /// Replace the authorization model used for role mapping.
    pub fn set_model(&self, model: Arc<AuthorizationModel>) -> Result<()> {
        let version = model.version();
        self.swap(|current| GuardState {
            snapshot: Arc::clone(&current.snapshot),
            model: Some(model),
        })?;
        debug!(version, "authorization model replaced");
        Ok(())
    }

    /// Decide a search against `index` for the caller described by `ctx`.
    ///
    /// Role-mapping failures abort the decision; they never turn into a pass.
    pub fn decide(&self, index: &str, ctx: &RequestContext) -> Result<AccessDecision> {
        let state = self.current()?;
        let policy = &state.snapshot;
        let admin_or_internal = self.is_admin_or_internal(ctx);

        if policy.is_security_index(index) && !admin_or_internal {
            debug!(index, "search on security index denied");
            return Ok(AccessDecision::Deny {
                reason: DenyReason::SecurityIndex,
            });
        }

        if policy.protected_indices_enabled()
            && policy.protected_indices().matches(index)
            && !self.holds_allowed_role(&state, ctx)?
        {
            debug!(index, "search on protected index denied");
            return Ok(AccessDecision::Deny {
                reason: DenyReason::ProtectedIndex,
            });
        }

        if policy.system_indices_enabled()
            && policy.system_indices().matches(index)
            && !self.is_admin_or_absent(ctx)
        {
            warn!(
                index,
                "search on system index {index} is not allowed for a non-admin user"
            );
            return Ok(AccessDecision::Deny {
                reason: DenyReason::SystemIndex,
            });
        }

        Ok(if self.filter.is_some() {
            AccessDecision::Delegate { admin_or_internal }
        } else {
            AccessDecision::Pass { admin_or_internal }
        })
    }

    /// Decide and act on the result stream: empty it, filter it, or return it as is.
    pub fn apply(&self, index: &str, ctx: &RequestContext, stream: R) -> Result<R> {
        match self.decide(index, ctx)? {
            AccessDecision::Deny { .. } => Ok(stream.into_empty()),
            AccessDecision::Delegate { admin_or_internal } => match &self.filter {
                Some(filter) => filter.wrap(stream, admin_or_internal),
                None => Ok(stream),
            },
            AccessDecision::Pass { .. } => Ok(stream),
        }
    }

    /// Administrator identity, or the internal configuration-request marker.
    /// An absent identity on its own is not trusted here.
    fn is_admin_or_internal(&self, ctx: &RequestContext) -> bool {
        ctx.user
            .as_ref()
            .is_some_and(|user| self.admin.is_admin(user))
            || ctx.is_internal_config_request()
    }

    /// Administrator identity, or no identity at all (plugin-originated call).
    fn is_admin_or_absent(&self, ctx: &RequestContext) -> bool {
        match &ctx.user {
            None => true,
            Some(user) => self.admin.is_admin(user),
        }
    }

    fn holds_allowed_role(&self, state: &GuardState, ctx: &RequestContext) -> Result<bool> {
        // no identity means no roles, whether or not a model has arrived yet
        let model = match (state.model.as_deref(), &ctx.user) {
            (Some(model), _) => model,
            (None, None) => return Ok(false),
            (None, Some(_)) => return Err(GuardError::ModelUnavailable),
        };
        let roles: BTreeSet<String> =
            self.roles.map_roles(model, ctx.user.as_ref(), ctx.remote_address)?;
        Ok(state.snapshot.allowed_roles().matches_any(&roles))
    }
}

impl<R: ResultStream> ConfigModelListener for AccessDecisionEngine<R> {
    fn on_config_model_changed(&self, model: Arc<AuthorizationModel>) {
        if let Err(err) = self.set_model(model) {
            error!(%err, "failed to install authorization model");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::admin::AdminDns;
    use crate::guard::roles::MappingRoleMapper;
    use crate::types::User;

    fn engine(settings: &GuardSettings) -> AccessDecisionEngine<Vec<u32>> {
        AccessDecisionEngine::attach(
            settings,
            Arc::new(AdminDns::new(["admin"]).unwrap()),
            Arc::new(MappingRoleMapper),
        )
        .unwrap()
    }

    #[test]
    fn protected_rule_without_model_fails_closed() {
        let settings = GuardSettings::builder()
            .protected_index("finance-*")
            .protected_indices_role("finance_admin")
            .protected_indices_enabled(true)
            .build();
        let engine = engine(&settings);
        let err = engine
            .decide("finance-2024", &RequestContext::for_user(User::new("bob")))
            .unwrap_err();
        assert!(matches!(err, GuardError::ModelUnavailable));
        // unprotected indices never consult the model
        assert_eq!(
            engine
                .decide("public", &RequestContext::for_user(User::new("bob")))
                .unwrap(),
            AccessDecision::Pass {
                admin_or_internal: false
            }
        );
    }

    #[test]
    fn protected_rule_without_model_denies_absent_identity() {
        let settings = GuardSettings::builder()
            .protected_index("finance-*")
            .protected_indices_role("finance_admin")
            .protected_indices_enabled(true)
            .build();
        let engine = engine(&settings);
        assert_eq!(
            engine
                .decide("finance-2024", &RequestContext::anonymous())
                .unwrap(),
            AccessDecision::Deny {
                reason: DenyReason::ProtectedIndex
            }
        );
        let out = engine
            .apply("finance-2024", &RequestContext::anonymous(), vec![1, 2, 3])
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn failed_reload_keeps_previous_snapshot() {
        let engine = engine(&GuardSettings::default());
        let before = engine.snapshot().unwrap();
        let bad = GuardSettings::builder()
            .system_index("/[/")
            .system_indices_enabled(true)
            .build();
        assert!(engine.reload_settings(&bad).is_err());
        assert!(Arc::ptr_eq(&before, &engine.snapshot().unwrap()));
    }

    #[test]
    fn reload_preserves_model_and_model_swap_preserves_snapshot() {
        let engine = engine(&GuardSettings::default());
        engine
            .set_model(Arc::new(AuthorizationModel::new(4, Vec::new())))
            .unwrap();
        let reloaded = GuardSettings::builder().security_index_name(".guard").build();
        engine.reload_settings(&reloaded).unwrap();
        assert_eq!(engine.model().unwrap().map(|m| m.version()), Some(4));

        engine.on_config_model_changed(Arc::new(AuthorizationModel::new(5, Vec::new())));
        assert_eq!(engine.snapshot().unwrap().security_index_name(), ".guard");
        assert_eq!(engine.model().unwrap().map(|m| m.version()), Some(5));
    }

    #[test]
    fn denied_stream_is_emptied() {
        let engine = engine(&GuardSettings::default());
        let out = engine
            .apply(".security", &RequestContext::anonymous(), vec![1, 2, 3])
            .unwrap();
        assert!(out.is_empty());
        let out = engine
            .apply("logs", &RequestContext::anonymous(), vec![1, 2, 3])
            .unwrap();
        assert_eq!(out, vec![1, 2, 3]);
    }
}
