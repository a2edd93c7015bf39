use std::time::Duration;

use thiserror::Error;

/// Failures of a submitted lookup.
///
/// `AlreadyInFlight` and `ShutDown` are returned synchronously by `submit`;
/// the rest reach the caller through delivery or [`QueryHandle::wait`].
///
/// [`QueryHandle::wait`]: super::QueryHandle::wait
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("a request for '{0}' is already in flight")]
    AlreadyInFlight(String),

    #[error("request was cancelled")]
    Cancelled,

    #[error("lookup failed: {0}")]
    WorkFailed(String),

    #[error("lookup timed out after {0:?}")]
    TimedOut(Duration),

    #[error("query executor has shut down")]
    ShutDown,
}

/// Outcome handed to the presentation context for a delivered request.
pub type QueryResult<T> = Result<T, QueryError>;
