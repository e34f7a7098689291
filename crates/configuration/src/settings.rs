use crate::error::ConfigError;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

/// Where the HTTP API listens and how much it accepts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on request bodies, in bytes.
    pub body_limit_bytes: usize,
}

/// Selects and configures the document store behind the repository.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub firestore: FirestoreConfig,
    pub postgres: PostgresConfig,
    pub memory: MemoryConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Firestore,
    Postgres,
    Memory,
}

/// Connection settings for Cloud Firestore's REST API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FirestoreConfig {
    pub project_id: Option<String>,
    pub database_id: String,
    /// `host:port` of a local emulator. When set, no access token is needed.
    pub emulator_host: Option<String>,
    /// Fixed OAuth2 bearer token for the production endpoint. It is never refreshed;
    /// leave unset to use application default credentials.
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostgresConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Reject range queries combined with other fields, like Firestore does
    /// without a composite index.
    pub require_composite_indexes: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    pub filter: String,
    /// Directory for daily-rolling log files. Stdout only when absent.
    pub directory: Option<String>,
    pub file_prefix: String,
}

// --- Default Implementations ---
// These let a deployment run with no config file at all.

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            database_id: "(default)".to_string(),
            emulator_host: None,
            access_token: None,
        }
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout_secs: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,tower_http=info".to_string(),
            directory: None,
            file_prefix: "apy-tracker.log".to_string(),
        }
    }
}

impl FirestoreConfig {
    /// Fills unset fields from the variables the Google client libraries honour.
    pub fn apply_env_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.project_id.is_none() {
            self.project_id = lookup("GOOGLE_CLOUD_PROJECT");
        }
        if self.emulator_host.is_none() {
            self.emulator_host = lookup("FIRESTORE_EMULATOR_HOST");
        }
        if self.access_token.is_none() {
            self.access_token = lookup("GOOGLE_OAUTH_ACCESS_TOKEN");
        }
    }
}

impl Config {
    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.body_limit_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "server.body_limit_bytes must be greater than zero".to_string(),
            ));
        }

        if self.store.backend == StoreBackend::Firestore {
            let firestore = &self.store.firestore;
            if firestore.project_id.as_deref() == Some("") {
                return Err(ConfigError::ValidationError(
                    "store.firestore.project_id must not be empty".to_string(),
                ));
            }
            // Application default credentials carry their own project; the
            // emulator and a fixed token do not.
            let explicit_credentials =
                firestore.emulator_host.is_some() || firestore.access_token.is_some();
            if explicit_credentials && firestore.project_id.is_none() {
                return Err(ConfigError::ValidationError(
                    "store.firestore.project_id (or GOOGLE_CLOUD_PROJECT) must be set \
                     when using the emulator or a fixed access token"
                        .to_string(),
                ));
            }
        }

        if self.store.backend == StoreBackend::Postgres
            && self.store.postgres.max_connections == 0
        {
            return Err(ConfigError::ValidationError(
                "store.postgres.max_connections must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
