//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `FIELDTALK_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use fieldtalk::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod experiments;
mod generation;
mod server;

pub use error::{ConfigError, ValidationError};
pub use experiments::ExperimentsConfig;
pub use generation::{GenerationConfig, ProviderKind};
pub use server::ServerConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, timeouts)
    #[serde(default)]
    pub server: ServerConfig,

    /// Generation provider configuration (OpenAI/Anthropic)
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Experiment catalog and storage configuration
    #[serde(default)]
    pub experiments: ExperimentsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `FIELDTALK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `FIELDTALK__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `FIELDTALK__GENERATION__OPENAI_API_KEY=...` -> `generation.openai_api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FIELDTALK")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.generation.validate()?;
        self.experiments.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Tests must not run concurrently: env vars are process-global.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("FIELDTALK__GENERATION__OPENAI_API_KEY", "sk-test-xxx");
    }

    fn clear_env() {
        env::remove_var("FIELDTALK__GENERATION__OPENAI_API_KEY");
        env::remove_var("FIELDTALK__SERVER__PORT");
        env::remove_var("FIELDTALK__GENERATION__PROVIDER");
        env::remove_var("FIELDTALK__EXPERIMENTS__DIR");
    }

    #[test]
    fn load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.generation.openai_api_key.as_deref(), Some("sk-test-xxx"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.generation.provider, ProviderKind::OpenAI);
        assert_eq!(config.experiments.dir.to_str(), Some("experiments"));
    }

    #[test]
    fn custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("FIELDTALK__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn provider_selection_from_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("FIELDTALK__GENERATION__PROVIDER", "anthropic");
        env::set_var("FIELDTALK__GENERATION__OPENAI_API_KEY", "sk-test-xxx");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.generation.provider, ProviderKind::Anthropic);
        // Anthropic selected but only an OpenAI key present.
        assert!(config.validate().is_err());
    }
}
