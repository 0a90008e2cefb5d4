//! Error types for the MisMatch wardrobe service.

use thiserror::Error;

/// Result type alias using MisMatch's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for wardrobe and outfit operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Outfit not found (or not owned by the caller)
    #[error("Outfit not found: {0}")]
    OutfitNotFound(uuid::Uuid),

    /// Outfit id that is not a UUID, so no outfit can have it
    #[error("Outfit not found: malformed id '{0}'")]
    MalformedOutfitId(String),

    /// Caller-supplied data was rejected (bad item reference, empty owner id)
    #[error("{0}")]
    Validation(String),

    /// Persistence layer unreachable or the bounded operation timeout expired
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Classify a sqlx failure.
    ///
    /// Connectivity problems (pool exhaustion, closed pool, socket or TLS
    /// failures) become [`Error::StoreUnavailable`]; everything else stays a
    /// [`Error::Database`] error.
    pub fn from_store(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => {
                Error::StoreUnavailable("timed out acquiring a database connection".to_string())
            }
            sqlx::Error::PoolClosed => {
                Error::StoreUnavailable("database pool is closed".to_string())
            }
            sqlx::Error::Io(e) => Error::StoreUnavailable(format!("database I/O failure: {}", e)),
            sqlx::Error::Tls(e) => Error::StoreUnavailable(format!("database TLS failure: {}", e)),
            other => Error::Database(other),
        }
    }

    /// Whether this error is one of the "not found" variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_) | Error::OutfitNotFound(_) | Error::MalformedOutfitId(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("test resource".to_string());
        assert_eq!(err.to_string(), "Not found: test resource");
    }

    #[test]
    fn test_error_display_outfit_not_found() {
        let id = Uuid::nil();
        let err = Error::OutfitNotFound(id);
        assert_eq!(err.to_string(), format!("Outfit not found: {}", id));
    }

    #[test]
    fn test_validation_message_is_bare() {
        let err = Error::Validation("invalid top item".to_string());
        assert_eq!(err.to_string(), "invalid top item");
    }

    #[test]
    fn test_error_display_store_unavailable() {
        let err = Error::StoreUnavailable("outfits.insert exceeded 5000ms".to_string());
        assert_eq!(
            err.to_string(),
            "Store unavailable: outfits.insert exceeded 5000ms"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("unknown STORE_BACKEND".to_string());
        assert_eq!(err.to_string(), "Configuration error: unknown STORE_BACKEND");
    }

    #[test]
    fn test_from_store_pool_timeout_is_unavailable() {
        let err = Error::from_store(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, Error::StoreUnavailable(_)));
    }

    #[test]
    fn test_from_store_pool_closed_is_unavailable() {
        let err = Error::from_store(sqlx::Error::PoolClosed);
        assert!(matches!(err, Error::StoreUnavailable(_)));
    }

    #[test]
    fn test_from_store_io_is_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = Error::from_store(sqlx::Error::Io(io));
        assert!(matches!(err, Error::StoreUnavailable(_)));
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn test_from_store_row_not_found_stays_database() {
        let err = Error::from_store(sqlx::Error::RowNotFound);
        assert!(matches!(err, Error::Database(_)));
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::NotFound("x".into()).is_not_found());
        assert!(Error::OutfitNotFound(Uuid::nil()).is_not_found());
        assert!(Error::MalformedOutfitId("garbage".into()).is_not_found());
        assert!(!Error::Validation("x".into()).is_not_found());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().starts_with("Serialization error:"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
