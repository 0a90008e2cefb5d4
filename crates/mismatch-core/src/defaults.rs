//! Centralized default constants for the MisMatch service.
//!
//! All crates reference these constants instead of defining their own magic
//! numbers. Environment variables read at startup override the ones that
//! are operator-tunable.

// =============================================================================
// OUTFIT NAMING
// =============================================================================

/// Prefix of auto-generated outfit names ("Outfit 1", "Outfit 2", ...).
pub const OUTFIT_NAME_PREFIX: &str = "Outfit";

/// Literal the outfit editor pre-fills; saving it unchanged counts as "no name".
pub const OUTFIT_PLACEHOLDER_NAME: &str = "My Outfit";

/// Maximum length (in characters) of a user-chosen outfit name.
pub const MAX_OUTFIT_NAME_LEN: usize = 100;

// =============================================================================
// STORE
// =============================================================================

/// Upper bound on a single repository call made by the composer.
pub const STORE_TIMEOUT_MS: u64 = 5_000;

/// Default database URL when DATABASE_URL is not set.
pub const DATABASE_URL: &str = "postgres://localhost/mismatch";

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP bind host.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Header carrying the authenticated user id, set by the session layer.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Sort key applied when a listing request names none.
pub const DEFAULT_SORT: &str = "newest";
