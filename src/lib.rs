#![deny(clippy::all, clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![cfg_attr(test, allow(clippy::uninlined_format_args))]
#![allow(clippy::module_name_repetitions)]
//
// Documentation lints: self-describing accessors don't need error/panic sections.
// Public APIs should still have proper documentation.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
//
// Builders and collaborator handles take owned values intentionally.
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::struct_excessive_bools)] // Settings naturally carry several policy flags
#![allow(clippy::implicit_hasher)]

//! Per-request authorization for a search engine's index read path.
//!
//! Every search opened against an index is run through an [`AccessDecisionEngine`]
//! before any data is returned. The engine denies the search outright (an empty result
//! stream), delegates it to a document/field filter, or passes it through unchanged.

/// The searchguard-core crate version (matches `Cargo.toml`).
pub const SEARCHGUARD_CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod constants;
pub mod error;
pub mod guard;
pub mod matcher;
pub mod types;

pub use constants::*;
pub use error::{GuardError, Result};
pub use guard::{
    AccessDecisionEngine, AdminCheck, AdminDns, AuthorizationModel, ConfigModelBus,
    ConfigModelListener, DocumentFilter, IndexSearchWrapper, MappingRoleMapper, PolicySnapshot,
    ResultStream, RoleMapper, RoleMapping,
};
pub use matcher::WildcardMatcher;
pub use types::{
    AccessDecision, DenyReason, GuardSettings, GuardSettingsBuilder, RequestContext,
    RequestOrigin, User,
};
