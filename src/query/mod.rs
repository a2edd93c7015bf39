//! Asynchronous lookups against the record store.

pub mod error;
pub mod executor;
pub mod handle;
pub mod options;

pub use error::{QueryError, QueryResult};
pub use executor::{DeliveryQueue, ExecutorConfig, QueryExecutor};
pub use handle::{QueryHandle, RequestState};
pub use options::QueryOptions;
pub use tokio_util::sync::CancellationToken;
