//! Repository layer over the document store
//!
//! Records are stored as JSON documents, one collection per record kind.
//! [`DocumentStore`] is the raw store contract; [`Repository`] adds typed
//! access and reference population on top of it.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod memory;
pub mod postgres;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Model,
};

/// Field holding a document's identity
pub const ID_FIELD: &str = "_id";

/// Equality match on one top-level field. Array fields match when they
/// contain the value.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Match on a reference field holding `id`
    pub fn reference(field: impl Into<String>, id: Uuid) -> Self {
        Self::new(field, id.to_string())
    }

    pub fn matches(&self, document: &Value) -> bool {
        match document.get(&self.field) {
            Some(Value::Array(items)) => items.contains(&self.value),
            Some(value) => *value == self.value,
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Option<Filter>,
    /// Fields to keep in each result; `_id` is always kept
    pub projection: Option<Vec<String>>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(filter: Filter) -> Self {
        Self {
            filter: Some(filter),
            projection: None,
        }
    }

    pub fn project(mut self, fields: &[&str]) -> Self {
        self.projection = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }
}

/// Reduce a document to `_id` plus the projected fields
pub fn project(document: Value, fields: &[String]) -> Value {
    match document {
        Value::Object(map) => {
            let kept: Map<String, Value> = map
                .into_iter()
                .filter(|(key, _)| key == ID_FIELD || fields.contains(key))
                .collect();
            Value::Object(kept)
        }
        other => other,
    }
}

/// Write `id` into the document's `_id` field
pub(crate) fn with_id(mut document: Value, id: Uuid) -> AppResult<Value> {
    match document.as_object_mut() {
        Some(map) => {
            map.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
            Ok(document)
        }
        None => Err(AppError::Internal(format!(
            "Only objects can be stored, got {}",
            document
        ))),
    }
}

/// Raw document store contract.
///
/// `insert` assigns the identity. `update_by_id` replaces the body but keeps
/// the identity, whatever `_id` the replacement carries. Lookups by id return
/// `None` when nothing matches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: &str, query: Query) -> AppResult<Vec<Value>>;

    async fn find_by_id(&self, collection: &str, id: Uuid) -> AppResult<Option<Value>>;

    async fn count(&self, collection: &str, filter: Option<Filter>) -> AppResult<u64>;

    /// Store a new document, returning it with its assigned `_id`
    async fn insert(&self, collection: &str, document: Value) -> AppResult<Value>;

    async fn update_by_id(
        &self,
        collection: &str,
        id: Uuid,
        document: Value,
    ) -> AppResult<Option<Value>>;

    async fn remove_by_id(&self, collection: &str, id: Uuid) -> AppResult<Option<Value>>;

    /// Check the store is reachable
    async fn ping(&self) -> AppResult<()>;

    /// Release connections. Called once after the server stops.
    async fn close(&self);
}

/// Typed access to the catalog collections
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn DocumentStore>,
}

impl Repository {
    /// Create a new repository over the given store
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub async fn list<M: Model>(&self) -> AppResult<Vec<M>> {
        self.find(M::COLLECTION, Query::all()).await
    }

    pub async fn list_where<M: Model>(&self, filter: Filter) -> AppResult<Vec<M>> {
        self.find(M::COLLECTION, Query::filter(filter)).await
    }

    /// Fetch documents of `M`'s collection decoded into a projection type
    pub async fn list_projected<M: Model, P: DeserializeOwned>(
        &self,
        fields: &[&str],
    ) -> AppResult<Vec<P>> {
        self.find(M::COLLECTION, Query::all().project(fields)).await
    }

    async fn find<T: DeserializeOwned>(&self, collection: &str, query: Query) -> AppResult<Vec<T>> {
        self.store
            .find(collection, query)
            .await?
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .collect()
    }

    pub async fn get<M: Model>(&self, id: Uuid) -> AppResult<Option<M>> {
        match self.store.find_by_id(M::COLLECTION, id).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    /// Resolve a set of references. Lookups run concurrently, one per
    /// distinct id. Dangling ids are simply absent from the map.
    pub async fn get_many<M: Model + 'static>(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, M>> {
        let distinct: HashSet<Uuid> = ids.iter().copied().collect();
        let mut lookups = JoinSet::new();
        for id in distinct {
            let repository = self.clone();
            lookups.spawn(async move { repository.get::<M>(id).await.map(|record| (id, record)) });
        }

        let mut found = HashMap::new();
        while let Some(joined) = lookups.join_next().await {
            let (id, record) = joined
                .map_err(|e| AppError::Internal(format!("Reference lookup failed: {}", e)))??;
            if let Some(record) = record {
                found.insert(id, record);
            }
        }
        Ok(found)
    }

    pub async fn count<M: Model>(&self, filter: Option<Filter>) -> AppResult<u64> {
        self.store.count(M::COLLECTION, filter).await
    }

    /// Persist a new record; the returned copy carries the assigned identity
    pub async fn insert<M: Model>(&self, record: &M) -> AppResult<M> {
        let doc = self
            .store
            .insert(M::COLLECTION, serde_json::to_value(record)?)
            .await?;
        Ok(serde_json::from_value(doc)?)
    }

    /// Replace the record stored under `id`. `None` when it no longer exists.
    pub async fn update<M: Model>(&self, id: Uuid, record: &M) -> AppResult<Option<M>> {
        match self
            .store
            .update_by_id(M::COLLECTION, id, serde_json::to_value(record)?)
            .await?
        {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn remove<M: Model>(&self, id: Uuid) -> AppResult<()> {
        if self.store.remove_by_id(M::COLLECTION, id).await?.is_none() {
            tracing::debug!("{} {} was already gone", M::COLLECTION, id);
        }
        Ok(())
    }
}
