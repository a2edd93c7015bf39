use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use tokio::sync::RwLock;

use super::{Filter, RecordStore, StoreError, StoreResult};
use crate::model::{Angel, Attribute, Status, compare_ids};

#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    /// JSON file the store is seeded from and flushed to on close.
    pub data_file: Option<PathBuf>,

    /// Artificial delay applied to every operation.
    pub latency: Duration,
}

impl StoreOptions {
    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = Some(path.into());
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

/// In-process document store.
pub struct MemoryStore {
    documents: RwLock<BTreeMap<String, Angel>>,
    options: StoreOptions,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new(options: StoreOptions) -> Self {
        Self {
            documents: RwLock::new(BTreeMap::new()),
            options,
            closed: AtomicBool::new(false),
        }
    }

    pub fn with_angels(options: StoreOptions, angels: impl IntoIterator<Item = Angel>) -> Self {
        let documents = angels
            .into_iter()
            .map(|angel| (angel.id().to_string(), angel))
            .collect();
        Self {
            documents: RwLock::new(documents),
            options,
            closed: AtomicBool::new(false),
        }
    }

    /// Open a store, seeding it from `options.data_file` when that file exists.
    pub async fn open(options: StoreOptions) -> StoreResult<Self> {
        let angels = match &options.data_file {
            Some(path) if path.exists() => read_documents(path).await?,
            Some(path) => {
                info!("Data file {:?} not found, starting empty", path);
                Vec::new()
            }
            None => Vec::new(),
        };
        info!("Opened store with {} angels", angels.len());
        Ok(Self::with_angels(options, angels))
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    async fn enter(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        if !self.options.latency.is_zero() {
            tokio::time::sleep(self.options.latency).await;
        }
        Ok(())
    }
}

async fn read_documents(path: &Path) -> StoreResult<Vec<Angel>> {
    let content = tokio::fs::read_to_string(path).await?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&content)?)
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn exists(&self, key: &str) -> StoreResult<bool> {
        self.enter().await?;
        Ok(self.documents.read().await.contains_key(key))
    }

    async fn get(&self, key: &str) -> StoreResult<Angel> {
        self.enter().await?;
        self.documents
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn query(&self, filter: &Filter) -> StoreResult<Vec<Angel>> {
        self.enter().await?;
        let documents = self.documents.read().await;
        let mut found: Vec<Angel> = documents
            .values()
            .filter(|angel| filter.matches(angel))
            .cloned()
            .collect();
        found.sort_by(|a, b| compare_ids(a.id(), b.id()));
        if let Some(limit) = filter.limit {
            found.truncate(limit);
        }
        debug!("Query {:?} matched {} angels", filter.criteria, found.len());
        Ok(found)
    }

    async fn insert(&self, angel: Angel) -> StoreResult<()> {
        self.enter().await?;
        let mut documents = self.documents.write().await;
        if documents.contains_key(angel.id()) {
            return Err(StoreError::Duplicate(angel.id().to_string()));
        }
        debug!("Inserted angel {}", angel.id());
        documents.insert(angel.id().to_string(), angel);
        Ok(())
    }

    async fn update(&self, key: &str, attribute: Attribute, value: &str) -> StoreResult<()> {
        if attribute == Attribute::Id {
            return Err(StoreError::ImmutableId);
        }
        if attribute == Attribute::Status {
            value.parse::<Status>()?;
        }
        self.enter().await?;
        let mut documents = self.documents.write().await;
        let angel = documents
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        angel.set(attribute, value);
        debug!("Updated {} of angel {} to '{}'", attribute, key, value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.enter().await?;
        self.documents
            .write()
            .await
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn close(&self) -> StoreResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let Some(path) = &self.options.data_file else {
            info!("Store closed");
            return Ok(());
        };

        let documents = self.documents.read().await;
        let mut angels: Vec<&Angel> = documents.values().collect();
        angels.sort_by(|a, b| compare_ids(a.id(), b.id()));
        let content = serde_json::to_string_pretty(&angels)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, content).await?;
        info!("Store flushed {} angels to {:?}", angels.len(), path);
        Ok(())
    }
}
