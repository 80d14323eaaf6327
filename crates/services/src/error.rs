//! Shared error types for the services crate.

use chrono::{DateTime, Utc};
use thiserror::Error;

use insight_core::model::{TestError, TestId};
use storage::repository::StorageError;

/// Reasons a session never becomes active.
///
/// These are reported as a redirect to the catalog, never shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionLoadError {
    #[error("no test was handed to the session")]
    Missing,
    #[error("test payload could not be decoded: {0}")]
    Malformed(String),
    #[error(transparent)]
    Invalid(#[from] TestError),
    #[error("session was already loaded")]
    AlreadyLoaded,
}

/// Errors emitted by `CatalogService` when preparing a session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("test {0} is not in the catalog")]
    UnknownTest(TestId),
    #[error("test {test_id} is not available until {opens_at}")]
    NotYetAvailable {
        test_id: TestId,
        opens_at: DateTime<Utc>,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}
