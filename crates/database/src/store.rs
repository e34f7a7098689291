use crate::error::DbError;
use crate::filter::{EducationalFilter, ProductFilter};
use async_trait::async_trait;
use core_types::{Alert, EducationalContent, Product};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

/// The three record collections kept in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Products,
    Alerts,
    Educational,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Alerts => "alerts",
            Collection::Educational => "educational",
        }
    }
}

/// A record ready to be written to its collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Product(Product),
    Alert(Alert),
    Educational(EducationalContent),
}

impl Record {
    pub fn collection(&self) -> Collection {
        match self {
            Record::Product(_) => Collection::Products,
            Record::Alert(_) => Collection::Alerts,
            Record::Educational(_) => Collection::Educational,
        }
    }

    /// Serializes the record into the flat JSON object that gets stored.
    pub fn to_document(&self) -> Result<Map<String, JsonValue>, DbError> {
        let value = match self {
            Record::Product(product) => serde_json::to_value(product)?,
            Record::Alert(alert) => serde_json::to_value(alert)?,
            Record::Educational(content) => serde_json::to_value(content)?,
        };
        match value {
            JsonValue::Object(fields) => Ok(fields),
            other => Err(DbError::StoreError(format!(
                "record for '{}' did not serialize to an object: {other}",
                self.collection().name()
            ))),
        }
    }
}

/// The narrow interface every document store adapter implements.
///
/// Adapters translate `FieldFilter` lists into their own query language and
/// report a missing composite index as `DbError::IndexRequired`, so callers never
/// inspect store-specific error text.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns every product matching all supplied criteria.
    async fn query_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, DbError>;

    /// Returns every article matching the optional topic.
    async fn query_educational(
        &self,
        filter: &EducationalFilter,
    ) -> Result<Vec<EducationalContent>, DbError>;

    /// Inserts a record and returns its store-generated identifier.
    async fn add_record(&self, record: Record) -> Result<String, DbError>;
}

/// Decodes raw JSON documents into typed records.
pub(crate) fn decode_documents<T: DeserializeOwned>(
    documents: Vec<JsonValue>,
) -> Result<Vec<T>, DbError> {
    documents
        .into_iter()
        .map(|document| serde_json::from_value(document).map_err(DbError::from))
        .collect()
}
