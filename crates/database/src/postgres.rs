use crate::error::DbError;
use crate::filter::{EducationalFilter, FieldFilter, FilterOp, ProductFilter};
use crate::store::{decode_documents, Collection, DocumentStore, Record};
use async_trait::async_trait;
use core_types::{EducationalContent, Product};
use serde_json::{Map, Value as JsonValue};
use sqlx::postgres::PgPool;
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder, Row};
use uuid::Uuid;

/// A document store that keeps every collection as JSONB rows in one Postgres table.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Creates a new store with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches the bodies of all documents in a collection that satisfy every filter,
    /// oldest first.
    async fn query_collection(
        &self,
        collection: Collection,
        filters: &[FieldFilter],
    ) -> Result<Vec<JsonValue>, DbError> {
        let mut query = build_select(collection, filters);
        let rows = query.build().fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| {
                row.try_get::<Json<JsonValue>, _>("body")
                    .map(|Json(body)| body)
                    .map_err(DbError::from)
            })
            .collect()
    }
}

/// Equality uses JSONB containment so numbers match regardless of representation.
/// Ranges only consider numeric fields; the CASE keeps the cast away from strings.
fn build_select(
    collection: Collection,
    filters: &[FieldFilter],
) -> QueryBuilder<'static, Postgres> {
    let mut query =
        QueryBuilder::<Postgres>::new("SELECT body FROM documents WHERE collection = ");
    query.push_bind(collection.name());

    for filter in filters {
        match filter.op {
            FilterOp::Eq => {
                let mut probe = Map::new();
                probe.insert(filter.field.to_string(), filter.value.clone());
                query.push(" AND body @> ");
                query.push_bind(Json(JsonValue::Object(probe)));
            }
            FilterOp::Gte | FilterOp::Lte => {
                let comparison = if filter.op == FilterOp::Gte { " >= " } else { " <= " };
                query.push(" AND (CASE WHEN jsonb_typeof(body -> ");
                query.push_bind(filter.field);
                query.push(") = 'number' THEN (body ->> ");
                query.push_bind(filter.field);
                query.push(")::double precision END)");
                query.push(comparison);
                query.push_bind(filter.value.as_f64());
            }
        }
    }

    query.push(" ORDER BY created_at ASC, id ASC");
    query
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn query_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, DbError> {
        let documents = self
            .query_collection(Collection::Products, &filter.field_filters())
            .await?;
        decode_documents(documents)
    }

    async fn query_educational(
        &self,
        filter: &EducationalFilter,
    ) -> Result<Vec<EducationalContent>, DbError> {
        let documents = self
            .query_collection(Collection::Educational, &filter.field_filters())
            .await?;
        decode_documents(documents)
    }

    async fn add_record(&self, record: Record) -> Result<String, DbError> {
        let id = Uuid::new_v4();
        let body = JsonValue::Object(record.to_document()?);

        sqlx::query("INSERT INTO documents (id, collection, body) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(record.collection().name())
            .bind(Json(body))
            .execute(&self.pool)
            .await?;

        Ok(id.to_string())
    }
}
