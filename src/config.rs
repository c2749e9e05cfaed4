//! Layered server configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. `tasklance.toml` in the working directory, when present
//! 3. Environment variables prefixed `TASKLANCE_`
//!
//! Token grants are only practical to supply through the TOML file.

use crate::identity::domain::{Role, UserId};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "tasklance.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "TASKLANCE_";

/// Static bearer token mapped to an actor.
///
/// Token issuance is external; this is the stand-in credential table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    /// Opaque bearer token.
    pub token: String,
    /// Identity the token resolves to.
    pub user_id: UserId,
    /// Role the token resolves to.
    pub role: Role,
}

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the server listens on.
    pub bind_address: SocketAddr,
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// Upper bound on pooled database connections.
    pub max_connections: u32,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Path prefix under which the API is mounted.
    pub api_prefix: String,
    /// Bearer token table.
    pub tokens: Vec<TokenGrant>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            database_url: "postgres://localhost/tasklance".to_owned(),
            max_connections: 10,
            log_filter: "info".to_owned(),
            api_prefix: "/api/v1".to_owned(),
            tokens: Vec::new(),
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or a value could not be decoded.
    #[error("configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    /// A value decoded but is unusable.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// Offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

impl ServerConfig {
    /// Loads configuration from every source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source is malformed or a value is
    /// rejected by [`ServerConfig::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Builds the provider chain without extracting it.
    #[must_use]
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Extracts and validates configuration from `figment`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when extraction or validation fails.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the server cannot start with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a blank database URL, a zero
    /// connection limit, or an API prefix without a leading slash.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database_url",
                reason: "must not be empty",
            });
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_connections",
                reason: "must be at least 1",
            });
        }
        if !self.api_prefix.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "api_prefix",
                reason: "must start with '/'",
            });
        }
        Ok(())
    }
}
