//! Public types exposed by the `searchguard-core` crate.

pub mod context;
pub mod decision;
pub mod settings;

pub use context::{RequestContext, RequestOrigin, User};
pub use decision::{AccessDecision, DenyReason};
pub use settings::{GuardSettings, GuardSettingsBuilder};
