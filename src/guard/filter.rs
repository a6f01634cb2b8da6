//! Seams to the search engine's result stream and the document/field filter.

use crate::error::Result;

/// Lazily produced search results that can be replaced by an empty stream.
pub trait ResultStream: Sized {
    /// A stream with the same shape that yields no documents.
    fn into_empty(self) -> Self;
}

impl<T> ResultStream for Vec<T> {
    fn into_empty(mut self) -> Self {
        self.clear();
        self
    }
}

/// Document/field-level narrowing, applied to every search that is not denied.
///
/// `admin_or_internal` lets the filter skip narrowing for trusted callers; returning
/// the input unchanged is always allowed.
pub trait DocumentFilter<R: ResultStream>: Send + Sync {
    fn wrap(&self, stream: R, admin_or_internal: bool) -> Result<R>;
}
