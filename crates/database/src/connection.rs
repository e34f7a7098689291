use crate::error::DbError;
use crate::firestore::FirestoreStore;
use crate::memory::MemoryStore;
use crate::postgres::PgDocumentStore;
use crate::store::DocumentStore;
use configuration::{PostgresConfig, StoreBackend, StoreConfig};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::env;
use std::sync::Arc;
use std::time::Duration;

/// Opens the configured document store.
///
/// The returned handle is thread-safe and meant to be created once at startup
/// and shared by every request.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, DbError> {
    let store: Arc<dyn DocumentStore> = match config.backend {
        StoreBackend::Firestore => Arc::new(FirestoreStore::connect(&config.firestore).await?),
        StoreBackend::Postgres => {
            let pool = connect_postgres(&config.postgres).await?;
            run_migrations(&pool).await?;
            Arc::new(PgDocumentStore::new(pool))
        }
        StoreBackend::Memory => Arc::new(MemoryStore::new(config.memory.require_composite_indexes)),
    };
    tracing::info!(backend = ?config.backend, "Document store ready.");
    Ok(store)
}

/// Establishes a connection pool to the PostgreSQL database.
///
/// Reads `DATABASE_URL` from the environment (a `.env` file is honoured).
pub async fn connect_postgres(config: &PostgresConfig) -> Result<PgPool, DbError> {
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL")
        .map_err(|_e| DbError::ConnectionConfigError("DATABASE_URL must be set.".to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded migrations so the `documents` table exists.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
