use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    Config, FirestoreConfig, LoggingConfig, MemoryConfig, PostgresConfig, ServerConfig,
    StoreBackend, StoreConfig,
};

/// Prefix for environment overrides, e.g. `APY__SERVER__PORT=9000`.
const ENV_PREFIX: &str = "APY";

/// Loads the application configuration.
///
/// Sources, lowest precedence first: built-in defaults, an optional `config.toml`
/// in the working directory, then `APY__`-prefixed environment variables. A `.env`
/// file is read into the environment beforehand when present.
pub fn load_config() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();

    let builder = config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut config = builder.try_deserialize::<Config>()?;
    config
        .store
        .firestore
        .apply_env_fallbacks(|key| std::env::var(key).ok());
    config.validate()?;

    Ok(config)
}

/// Parses and validates configuration from an in-memory TOML document.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_backend_needs_no_credentials() {
        let config = parse_config("[store]\nbackend = \"memory\"\n").unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(!config.store.memory.require_composite_indexes);
        assert_eq!(config.logging.file_prefix, "apy-tracker.log");
    }

    #[test]
    fn sections_override_defaults() {
        let config = parse_config(
            r#"
            [server]
            port = 9090

            [store]
            backend = "postgres"

            [store.postgres]
            max_connections = 4

            [logging]
            filter = "debug"
            directory = "logs"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.store.backend, StoreBackend::Postgres);
        assert_eq!(config.store.postgres.max_connections, 4);
        assert_eq!(config.store.postgres.acquire_timeout_secs, 5);
        assert_eq!(config.logging.directory.as_deref(), Some("logs"));
    }

    #[test]
    fn firestore_defaults_to_application_credentials() {
        let config = parse_config("[store]\nbackend = \"firestore\"\n").unwrap();
        assert_eq!(config.store.backend, StoreBackend::Firestore);
        assert_eq!(config.store.firestore.project_id, None);
        assert_eq!(config.store.firestore.access_token, None);
    }

    #[test]
    fn emulator_without_project_is_rejected() {
        let err = parse_config("[store.firestore]\nemulator_host = \"localhost:8080\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("project_id")));
    }

    #[test]
    fn empty_project_is_rejected() {
        let err = parse_config("[store.firestore]\nproject_id = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("empty")));
    }

    #[test]
    fn firestore_emulator_is_enough() {
        let config = parse_config(
            "[store.firestore]\nproject_id = \"apy-tracker\"\nemulator_host = \"localhost:8080\"\n",
        )
        .unwrap();
        assert_eq!(config.store.firestore.database_id, "(default)");
    }

    #[test]
    fn env_fallbacks_only_fill_unset_fields() {
        let mut firestore = FirestoreConfig {
            project_id: Some("from-file".to_string()),
            ..FirestoreConfig::default()
        };
        firestore.apply_env_fallbacks(|key| match key {
            "GOOGLE_CLOUD_PROJECT" => Some("from-env".to_string()),
            "GOOGLE_OAUTH_ACCESS_TOKEN" => Some("token".to_string()),
            _ => None,
        });
        assert_eq!(firestore.project_id.as_deref(), Some("from-file"));
        assert_eq!(firestore.access_token.as_deref(), Some("token"));
        assert_eq!(firestore.emulator_host, None);
    }

    #[test]
    fn zero_body_limit_is_rejected() {
        let err = parse_config("[server]\nbody_limit_bytes = 0\n[store]\nbackend = \"memory\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
