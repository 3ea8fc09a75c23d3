use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Missing env var DATABASE_URL. Set the connection string for the backing store.")]
    MissingDatabaseUrl,

    #[error("Unsupported database URL scheme '{0}': expected postgres or sqlite")]
    UnsupportedScheme(String),
}
