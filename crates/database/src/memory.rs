use crate::error::DbError;
use crate::filter::{EducationalFilter, FieldFilter, FilterOp, ProductFilter};
use crate::store::{decode_documents, Collection, DocumentStore, Record};
use async_trait::async_trait;
use core_types::{EducationalContent, Product};
use serde_json::Value as JsonValue;
use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;
use uuid::Uuid;

/// A process-local document store for development and tests.
///
/// Documents are kept in insertion order per collection. With
/// `require_composite_indexes` enabled it rejects the same multi-field range
/// queries Firestore rejects without a composite index.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<(String, JsonValue)>>>,
    require_composite_indexes: bool,
}

impl MemoryStore {
    pub fn new(require_composite_indexes: bool) -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            require_composite_indexes,
        }
    }

    /// Number of documents currently stored in a collection.
    pub fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .map(|collections| collections.get(&collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn check_indexes(
        &self,
        collection: Collection,
        filters: &[FieldFilter],
    ) -> Result<(), DbError> {
        if !self.require_composite_indexes {
            return Ok(());
        }
        let has_range = filters.iter().any(|f| f.op != FilterOp::Eq);
        let fields: BTreeSet<&str> = filters.iter().map(|f| f.field).collect();
        if has_range && fields.len() > 1 {
            let fields: Vec<&str> = fields.into_iter().collect();
            return Err(DbError::IndexRequired {
                hint: format!(
                    "memory://indexes/{}?fields={}",
                    collection.name(),
                    fields.join(",")
                ),
            });
        }
        Ok(())
    }

    fn query_collection(
        &self,
        collection: Collection,
        filters: &[FieldFilter],
    ) -> Result<Vec<JsonValue>, DbError> {
        self.check_indexes(collection, filters)?;
        let collections = self
            .collections
            .read()
            .map_err(|_| DbError::StoreError("in-memory store lock poisoned".to_string()))?;

        let documents = collections
            .get(&collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|(_, document)| filters.iter().all(|f| f.matches(document)))
                    .map(|(_, document)| document.clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(documents)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn query_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, DbError> {
        let documents = self.query_collection(Collection::Products, &filter.field_filters())?;
        decode_documents(documents)
    }

    async fn query_educational(
        &self,
        filter: &EducationalFilter,
    ) -> Result<Vec<EducationalContent>, DbError> {
        let documents = self.query_collection(Collection::Educational, &filter.field_filters())?;
        decode_documents(documents)
    }

    async fn add_record(&self, record: Record) -> Result<String, DbError> {
        let document = JsonValue::Object(record.to_document()?);
        let id = Uuid::new_v4().to_string();
        let mut collections = self
            .collections
            .write()
            .map_err(|_| DbError::StoreError("in-memory store lock poisoned".to_string()))?;
        collections
            .entry(record.collection())
            .or_default()
            .push((id.clone(), document));
        Ok(id)
    }
}
