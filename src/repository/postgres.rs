//! PostgreSQL document store: one `documents` table, JSONB bodies

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use uuid::Uuid;

use super::{project, with_id, DocumentStore, Filter, Query};
use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
};

/// Matches a scalar field equal to $3, or an array field containing it
const FILTER_CLAUSE: &str = r#"
    AND (body -> $2::text = $3::jsonb
         OR (jsonb_typeof(body -> $2::text) = 'array'
             AND body -> $2::text @> jsonb_build_array($3::jsonb)))
"#;

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Connect and bring the schema up to date
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::Internal(format!("Migration failed: {}", e)))?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn find(&self, collection: &str, query: Query) -> AppResult<Vec<Value>> {
        let rows: Vec<Value> = match &query.filter {
            Some(Filter { field, value }) => {
                let sql = format!(
                    "SELECT body FROM documents WHERE collection = $1 {} ORDER BY created_at, id",
                    FILTER_CLAUSE
                );
                sqlx::query_scalar(&sql)
                    .bind(collection)
                    .bind(field)
                    .bind(value)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar(
                    "SELECT body FROM documents WHERE collection = $1 ORDER BY created_at, id",
                )
                .bind(collection)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(match &query.projection {
            Some(fields) => rows.into_iter().map(|doc| project(doc, fields)).collect(),
            None => rows,
        })
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> AppResult<Option<Value>> {
        let body = sqlx::query_scalar("SELECT body FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(body)
    }

    async fn count(&self, collection: &str, filter: Option<Filter>) -> AppResult<u64> {
        let count: i64 = match filter {
            Some(Filter { field, value }) => {
                let sql = format!(
                    "SELECT COUNT(*) FROM documents WHERE collection = $1 {}",
                    FILTER_CLAUSE
                );
                sqlx::query_scalar(&sql)
                    .bind(collection)
                    .bind(field)
                    .bind(value)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = $1")
                    .bind(collection)
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count.max(0) as u64)
    }

    async fn insert(&self, collection: &str, document: Value) -> AppResult<Value> {
        let id = Uuid::new_v4();
        let document = with_id(document, id)?;
        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(id)
            .bind(&document)
            .execute(&self.pool)
            .await?;
        Ok(document)
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: Uuid,
        document: Value,
    ) -> AppResult<Option<Value>> {
        let document = with_id(document, id)?;
        let body = sqlx::query_scalar(
            r#"
            UPDATE documents SET body = $3, modified_at = now()
            WHERE collection = $1 AND id = $2
            RETURNING body
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(&document)
        .fetch_optional(&self.pool)
        .await?;
        Ok(body)
    }

    async fn remove_by_id(&self, collection: &str, id: Uuid) -> AppResult<Option<Value>> {
        let body = sqlx::query_scalar(
            "DELETE FROM documents WHERE collection = $1 AND id = $2 RETURNING body",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(body)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
