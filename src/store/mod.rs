//! Aggregate store contract
//!
//! The document store is a collaborator: the engine only needs a keyed
//! read/replace/delete contract partitioned by (remix id, owner id). The
//! trait keeps backends swappable; [`MemoryRemixStore`] serves tests and
//! single-process hosts. Records pass through [`Remix::migrate`] at the
//! read boundary so lenient defaulting of older shapes lives in one place.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::models::Remix;

/// Repository for remix aggregates, keyed by (id, owner id)
#[async_trait]
pub trait RemixStore: Send + Sync {
    /// Insert or overwrite an aggregate
    async fn upsert(&self, remix: &Remix) -> Result<()>;

    /// Read an aggregate; `Ok(None)` if absent
    async fn read(&self, id: &str, owner_id: &str) -> Result<Option<Remix>>;

    /// Replace an existing aggregate (optimistic overwrite, no merge)
    ///
    /// Fails with [`Error::NotFound`] if the key is absent.
    async fn replace(&self, id: &str, owner_id: &str, remix: &Remix) -> Result<()>;

    /// Delete an aggregate
    ///
    /// Fails with [`Error::NotFound`] if the key is absent.
    async fn delete(&self, id: &str, owner_id: &str) -> Result<()>;

    /// All aggregates for an owner, ordered by creation time descending
    async fn query(&self, owner_id: &str) -> Result<Vec<Remix>>;
}

/// In-process store backed by a HashMap
///
/// Single-writer-per-aggregate is assumed by the lifecycle design; the lock
/// here only guards map structure, not read-modify-write cycles.
#[derive(Default)]
pub struct MemoryRemixStore {
    records: RwLock<HashMap<(String, String), Remix>>,
}

impl MemoryRemixStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn key(id: &str, owner_id: &str) -> (String, String) {
        (id.to_string(), owner_id.to_string())
    }
}

#[async_trait]
impl RemixStore for MemoryRemixStore {
    async fn upsert(&self, remix: &Remix) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert(Self::key(&remix.id, &remix.owner_id), remix.clone());
        Ok(())
    }

    async fn read(&self, id: &str, owner_id: &str) -> Result<Option<Remix>> {
        let records = self.records.read().await;
        Ok(records
            .get(&Self::key(id, owner_id))
            .cloned()
            .map(Remix::migrate))
    }

    async fn replace(&self, id: &str, owner_id: &str, remix: &Remix) -> Result<()> {
        let mut records = self.records.write().await;
        let key = Self::key(id, owner_id);
        if !records.contains_key(&key) {
            return Err(Error::not_found(format!("remix {id} for owner {owner_id}")));
        }
        records.insert(key, remix.clone());
        Ok(())
    }

    async fn delete(&self, id: &str, owner_id: &str) -> Result<()> {
        let mut records = self.records.write().await;
        let key = Self::key(id, owner_id);
        if records.remove(&key).is_none() {
            return Err(Error::not_found(format!("remix {id} for owner {owner_id}")));
        }
        Ok(())
    }

    async fn query(&self, owner_id: &str) -> Result<Vec<Remix>> {
        let records = self.records.read().await;
        let mut results: Vec<Remix> = records
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .map(Remix::migrate)
            .collect();
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(results)
    }
}
