use serde::Deserialize;

use crate::error::ConfigError;

/// The root settings structure for the whole service.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
}

/// Where the HTTP server binds.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Connection-pool sizing and the connection string for the backing store.
///
/// The defaults are tuned for serverless deployments: a small pool that
/// opens connections only when first used, and a short acquisition
/// timeout so an exhausted pool fails fast instead of queueing requests.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Connection URL. Usually supplied through the `DATABASE_URL`
    /// environment variable rather than a config file.
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self::for_url("")
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_max_connections() -> u32 {
    4
}
fn default_min_connections() -> u32 {
    0
}
fn default_acquire_timeout_secs() -> u64 {
    5
}

/// The storage engine behind a connection URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageEngine {
    Postgres,
    Sqlite,
}

impl DatabaseSettings {
    /// Settings for the given URL with the default pool sizing.
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }

    /// Determines the storage engine from the URL scheme.
    pub fn engine(&self) -> Result<StorageEngine, ConfigError> {
        let scheme = self.url.split(':').next().unwrap_or("");
        match scheme {
            "postgres" | "postgresql" => Ok(StorageEngine::Postgres),
            "sqlite" => Ok(StorageEngine::Sqlite),
            other => Err(ConfigError::UnsupportedScheme(other.to_string())),
        }
    }

    /// The URL handed to the connection pool.
    ///
    /// Postgres URLs get `sslmode=require` appended when the caller did
    /// not pick a mode themselves; the managed Postgres providers we
    /// deploy against refuse plaintext connections. A URL that already
    /// carries any `sslmode` is passed through untouched.
    pub fn connection_url(&self) -> Result<String, ConfigError> {
        match self.engine()? {
            StorageEngine::Sqlite => Ok(self.url.clone()),
            StorageEngine::Postgres => {
                if self.url.contains("sslmode=") {
                    Ok(self.url.clone())
                } else if self.url.contains('?') {
                    Ok(format!("{}&sslmode=require", self.url))
                } else {
                    Ok(format!("{}?sslmode=require", self.url))
                }
            }
        }
    }
}
