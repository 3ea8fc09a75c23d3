// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{DatabaseSettings, HttpSettings, Settings, StorageEngine};

/// Loads the service settings from the optional `welhome.toml` file and
/// the environment.
///
/// Precedence is file, then `WELHOME__*` variables, then the plain
/// `DATABASE_URL` variable as the connection string of last resort.
/// `DATABASE_URL` is how the service has always been deployed, so it is
/// required whenever no other source supplied a URL.
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from("welhome")
}

/// Same as `load_settings`, but reads the named config file instead of
/// the default `welhome.toml`.
pub fn load_settings_from(config_name: &str) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        // The config file is optional; everything has a default or can
        // come from the environment.
        .add_source(config::File::with_name(config_name).required(false))
        // Environment overrides, e.g. WELHOME__DATABASE__MAX_CONNECTIONS=8
        .add_source(
            config::Environment::with_prefix("WELHOME")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let mut settings = builder.try_deserialize::<Settings>()?;

    if settings.database.url.is_empty() {
        settings.database.url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;
    }

    Ok(settings)
}
