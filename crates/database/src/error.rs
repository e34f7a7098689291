use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load configuration for the document store: {0}")]
    ConnectionConfigError(String),

    #[error("Postgres request failed: {0}")]
    SqlError(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Firestore request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Firestore authentication failed: {0}")]
    AuthError(#[from] gcp_auth::Error),

    #[error("An error occurred during JSON serialization/deserialization: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The store refused a multi-field query until a composite index exists.
    #[error("This query requires a Firestore composite index. Please create it at: {hint}")]
    IndexRequired { hint: String },

    #[error("{0}")]
    StoreError(String),
}

impl DbError {
    pub fn is_index_required(&self) -> bool {
        matches!(self, DbError::IndexRequired { .. })
    }
}
