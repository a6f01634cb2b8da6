//! Index access guard: policy snapshot, collaborators and the decision engine.

pub mod admin;
pub mod bus;
pub mod engine;
pub mod filter;
pub mod policy;
pub mod roles;
pub mod wrapper;

pub use admin::{AdminCheck, AdminDns};
pub use bus::{ConfigModelBus, ConfigModelListener};
pub use engine::AccessDecisionEngine;
pub use filter::{DocumentFilter, ResultStream};
pub use policy::PolicySnapshot;
pub use roles::{AuthorizationModel, MappingRoleMapper, RoleMapper, RoleMapping};
pub use wrapper::IndexSearchWrapper;
