//! # APY Tracker Database Crate
//!
//! This crate is the application's interface to its document store: product
//! listings, alert subscriptions and educational articles.
//!
//! ## Architectural Principles
//!
//! - **Adapter Boundary:** Every store implements the narrow `DocumentStore` trait.
//!   Firestore (REST), Postgres (JSONB via `sqlx`) and an in-process store are
//!   interchangeable without touching the API or the calculator.
//! - **Explicit Filters:** Query criteria become a list of `(field, operator, value)`
//!   triples; each adapter translates that list into its own query language.
//! - **Typed Store Failures:** Adapters report a missing composite index as
//!   `DbError::IndexRequired`, so nobody above this crate parses error text.
//!
//! ## Public API
//!
//! - `connect`: Opens the store selected in `StoreConfig`.
//! - `DbRepository`: High-level data access (`get_products`, `add_product`, `save_alert`, ...).
//! - `ProductFilter`, `EducationalFilter`, `SortSpec`: Query inputs.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod filter;
pub mod firestore;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod sorting;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_postgres, run_migrations};
pub use error::DbError;
pub use filter::{EducationalFilter, FieldFilter, FilterOp, ProductFilter};
pub use firestore::FirestoreStore;
pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;
pub use repository::DbRepository;
pub use sorting::{sort_records, SortSpec};
pub use store::{Collection, DocumentStore, Record};
