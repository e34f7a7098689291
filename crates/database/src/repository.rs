use crate::error::DbError;
use crate::filter::{EducationalFilter, ProductFilter};
use crate::sorting::{sort_records, SortSpec};
use crate::store::{DocumentStore, Record};
use core_types::{Alert, EducationalContent, Product};
use std::sync::Arc;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the document store. Store-specific querying lives behind `DocumentStore`.
#[derive(Clone)]
pub struct DbRepository {
    store: Arc<dyn DocumentStore>,
}

impl DbRepository {
    /// Creates a new `DbRepository` around a shared store handle.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Fetches the products matching every supplied criterion, optionally sorted
    /// in-process afterwards.
    pub async fn get_products(
        &self,
        filter: &ProductFilter,
        sort: Option<&SortSpec>,
    ) -> Result<Vec<Product>, DbError> {
        let products = self.store.query_products(filter).await.inspect_err(|e| {
            if e.is_index_required() {
                tracing::warn!(error = %e, ?filter, "Product query needs a composite index.");
            } else {
                tracing::error!(error = %e, ?filter, "Product query failed.");
            }
        })?;
        tracing::debug!(count = products.len(), "Fetched products.");

        Ok(match sort {
            Some(spec) if !products.is_empty() => sort_records(products, spec),
            _ => products,
        })
    }

    /// Stores a new product listing. Duplicates are allowed.
    pub async fn add_product(&self, product: Product) -> Result<String, DbError> {
        let id = self.store.add_record(Record::Product(product)).await?;
        tracing::info!(%id, "Product added.");
        Ok(id)
    }

    /// Stores an alert subscription for later, out-of-band processing.
    pub async fn save_alert(&self, alert: Alert) -> Result<String, DbError> {
        let id = self.store.add_record(Record::Alert(alert)).await?;
        tracing::info!(%id, "Alert saved.");
        Ok(id)
    }

    pub async fn get_educational_content(
        &self,
        filter: &EducationalFilter,
    ) -> Result<Vec<EducationalContent>, DbError> {
        self.store.query_educational(filter).await.inspect_err(|e| {
            tracing::error!(error = %e, ?filter, "Educational content query failed.");
        })
    }

    pub async fn add_educational_content(
        &self,
        content: EducationalContent,
    ) -> Result<String, DbError> {
        let id = self.store.add_record(Record::Educational(content)).await?;
        tracing::info!(%id, "Educational content added.");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use core_types::{ProductType, SortOrder};
    use rust_decimal_macros::dec;

    fn cd(bank: &str, term: i32) -> Product {
        Product {
            bank: bank.to_string(),
            name: format!("{term}-Month CD"),
            apy: dec!(4.5),
            product_type: ProductType::Cd,
            min_deposit: dec!(1000),
            term: Some(term),
            state: None,
            details_url: None,
            features: Some(vec!["Fixed rate".to_string()]),
        }
    }

    #[tokio::test]
    async fn added_product_round_trips_unchanged() {
        let repo = DbRepository::new(Arc::new(MemoryStore::default()));
        let product = cd("Capital One", 12);
        repo.add_product(product.clone()).await.unwrap();

        let filter = ProductFilter {
            bank: Some("Capital One".to_string()),
            ..ProductFilter::default()
        };
        let found = repo.get_products(&filter, None).await.unwrap();
        assert_eq!(found, vec![product]);
    }

    #[tokio::test]
    async fn products_are_sorted_after_retrieval() {
        let repo = DbRepository::new(Arc::new(MemoryStore::default()));
        for (bank, term) in [("A", 12), ("B", 36), ("C", 6)] {
            repo.add_product(cd(bank, term)).await.unwrap();
        }

        let spec = SortSpec::new("term", SortOrder::Desc);
        let sorted = repo.get_products(&ProductFilter::default(), Some(&spec)).await.unwrap();
        let banks: Vec<_> = sorted.iter().map(|p| p.bank.as_str()).collect();
        assert_eq!(banks, vec!["B", "A", "C"]);
    }

    #[tokio::test]
    async fn educational_content_is_filtered_by_topic() {
        let repo = DbRepository::new(Arc::new(MemoryStore::default()));
        for (title, topic) in [("What is APY?", "basics"), ("CD vs HYSA", "comparisons")] {
            repo.add_educational_content(EducationalContent {
                title: title.to_string(),
                content: "...".to_string(),
                topic: topic.to_string(),
                summary: None,
            })
            .await
            .unwrap();
        }

        let basics = repo
            .get_educational_content(&EducationalFilter {
                topic: Some("basics".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(basics.len(), 1);
        assert_eq!(basics[0].title, "What is APY?");

        let all = repo
            .get_educational_content(&EducationalFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }
}
