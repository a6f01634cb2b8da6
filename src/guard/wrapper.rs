//! Per-index handle onto a shared [`AccessDecisionEngine`].

use std::sync::Arc;

use crate::error::Result;
use crate::guard::engine::AccessDecisionEngine;
use crate::guard::filter::ResultStream;
use crate::types::{AccessDecision, RequestContext};

/// Binds one index to a shared decision engine, one per index attachment.
pub struct IndexSearchWrapper<R: ResultStream> {
    index: String,
    engine: Arc<AccessDecisionEngine<R>>,
}

impl<R: ResultStream> IndexSearchWrapper<R> {
    pub fn new<S: Into<String>>(index: S, engine: Arc<AccessDecisionEngine<R>>) -> Self {
        Self {
            index: index.into(),
            engine,
        }
    }

    #[must_use]
    pub fn index(&self) -> &str {
        &self.index
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<AccessDecisionEngine<R>> {
        &self.engine
    }

    pub fn decide(&self, ctx: &RequestContext) -> Result<AccessDecision> {
        self.engine.decide(&self.index, ctx)
    }

    /// Run the index's result stream through the guard.
    pub fn apply(&self, ctx: &RequestContext, stream: R) -> Result<R> {
        self.engine.apply(&self.index, ctx, stream)
    }
}
