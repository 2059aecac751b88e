//! In-process document store
//!
//! Keeps every collection in insertion order. Used for development runs
//! (`database.url = "memory"`) and by the test suite.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{project, with_id, DocumentStore, Filter, Query};
use crate::error::AppResult;

type Collection = IndexMap<Uuid, Value>;

#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: &str, query: Query) -> AppResult<Vec<Value>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(docs
            .values()
            .filter(|doc| query.filter.as_ref().map_or(true, |f| f.matches(doc)))
            .map(|doc| match &query.projection {
                Some(fields) => project(doc.clone(), fields),
                None => doc.clone(),
            })
            .collect())
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> AppResult<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(&id))
            .cloned())
    }

    async fn count(&self, collection: &str, filter: Option<Filter>) -> AppResult<u64> {
        let collections = self.collections.read().await;
        let count = collections.get(collection).map_or(0, |docs| {
            docs.values()
                .filter(|doc| filter.as_ref().map_or(true, |f| f.matches(doc)))
                .count()
        });
        Ok(count as u64)
    }

    async fn insert(&self, collection: &str, document: Value) -> AppResult<Value> {
        let id = Uuid::new_v4();
        let document = with_id(document, id)?;
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, document.clone());
        Ok(document)
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: Uuid,
        document: Value,
    ) -> AppResult<Option<Value>> {
        let document = with_id(document, id)?;
        let mut collections = self.collections.write().await;
        match collections.get_mut(collection).and_then(|docs| docs.get_mut(&id)) {
            Some(slot) => {
                *slot = document.clone();
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }

    async fn remove_by_id(&self, collection: &str, id: Uuid) -> AppResult<Option<Value>> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(collection)
            .and_then(|docs| docs.shift_remove(&id)))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn close(&self) {}
}
