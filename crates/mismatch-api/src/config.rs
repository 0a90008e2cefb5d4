//! Server configuration from environment variables.
//!
//! Environment variables:
//!   DATABASE_URL             - PostgreSQL URL (default: "postgres://localhost/mismatch")
//!   HOST / PORT              - bind address (default: 0.0.0.0:3000)
//!   STORE_BACKEND            - "postgres" or "memory" (default: "postgres")
//!   DB_MAX_CONNECTIONS       - pool size (default: 10)
//!   OUTFIT_NAME_PREFIX       - auto-name prefix (default: "Outfit")
//!   OUTFIT_PLACEHOLDER_NAME  - name treated as "no name given" (default: "My Outfit")
//!   STORE_TIMEOUT_MS         - per-call store deadline (default: 5000)
//!   ENFORCE_ITEM_CATEGORIES  - "true"/"1" to require slot/category match (default: false)

use std::time::Duration;

use mismatch_core::defaults;
use mismatch_core::{Error, Result};
use mismatch_db::pool::DEFAULT_MAX_CONNECTIONS;

use crate::services::ComposerConfig;

/// Which storage backend serves the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StoreBackend::Postgres),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(Error::Config(format!(
                "unknown STORE_BACKEND '{}' (expected 'postgres' or 'memory')",
                other
            ))),
        }
    }
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub backend: StoreBackend,
    pub max_connections: u32,
    pub composer: ComposerConfig,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| defaults::DATABASE_URL.to_string());
        let host = lookup("HOST").unwrap_or_else(|| defaults::SERVER_HOST.to_string());
        let port: u16 = lookup("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults::SERVER_PORT);

        let backend = match lookup("STORE_BACKEND") {
            Some(v) => StoreBackend::parse(&v)?,
            None => StoreBackend::Postgres,
        };
        let max_connections: u32 = lookup("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let store_timeout_ms: u64 = lookup("STORE_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(defaults::STORE_TIMEOUT_MS);
        let enforce_categories = lookup("ENFORCE_ITEM_CATEGORIES")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let composer = ComposerConfig {
            name_prefix: lookup("OUTFIT_NAME_PREFIX")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| defaults::OUTFIT_NAME_PREFIX.to_string()),
            placeholder_name: lookup("OUTFIT_PLACEHOLDER_NAME")
                .unwrap_or_else(|| defaults::OUTFIT_PLACEHOLDER_NAME.to_string()),
            store_timeout: Duration::from_millis(store_timeout_ms),
            enforce_categories,
        };

        Ok(Self {
            database_url,
            host,
            port,
            backend,
            max_connections,
            composer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, defaults::DATABASE_URL);
        assert_eq!(config.port, 3000);
        assert_eq!(config.backend, StoreBackend::Postgres);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.composer.name_prefix, "Outfit");
        assert_eq!(config.composer.placeholder_name, "My Outfit");
        assert_eq!(config.composer.store_timeout, Duration::from_millis(5000));
        assert!(!config.composer.enforce_categories);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("STORE_BACKEND", "memory"),
            ("OUTFIT_NAME_PREFIX", "My Outfit"),
            ("STORE_TIMEOUT_MS", "250"),
            ("ENFORCE_ITEM_CATEGORIES", "true"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.backend, StoreBackend::Memory);
        assert_eq!(config.composer.name_prefix, "My Outfit");
        assert_eq!(config.composer.store_timeout, Duration::from_millis(250));
        assert!(config.composer.enforce_categories);
    }

    #[test]
    fn test_bad_numbers_fall_back_to_defaults() {
        let config = config_from(&[
            ("PORT", "not-a-port"),
            ("DB_MAX_CONNECTIONS", "-3"),
            ("STORE_TIMEOUT_MS", "0"),
        ])
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.composer.store_timeout, Duration::from_millis(5000));
    }

    #[test]
    fn test_unknown_backend_is_config_error() {
        let err = config_from(&[("STORE_BACKEND", "mongo")]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
