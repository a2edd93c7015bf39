//! Record store collaborators.
//!
//! The core only depends on [`RecordStore`]; [`MemoryStore`] is the bundled
//! implementation, optionally backed by a JSON document file.

pub mod actions;
pub mod filter;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Angel, Attribute, ModelError};

pub use filter::{Criteria, Filter};
pub use memory::{MemoryStore, StoreOptions};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no angel with id '{0}'")]
    NotFound(String),

    #[error("an angel with id '{0}' already exists")]
    Duplicate(String),

    #[error("the id attribute cannot be updated")]
    ImmutableId,

    #[error("a value for {0} is required")]
    MissingValue(Attribute),

    #[error("store is closed")]
    Closed,

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed store document: {0}")]
    Format(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A document store keyed by angel id.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    async fn get(&self, key: &str) -> StoreResult<Angel>;

    /// Matching angels, sorted by id.
    async fn query(&self, filter: &Filter) -> StoreResult<Vec<Angel>>;

    async fn insert(&self, angel: Angel) -> StoreResult<()>;

    async fn update(&self, key: &str, attribute: Attribute, value: &str) -> StoreResult<()>;

    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Flush and release the store. Later calls fail with [`StoreError::Closed`].
    async fn close(&self) -> StoreResult<()>;
}
