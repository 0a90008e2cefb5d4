//! Identifier helpers.
//!
//! Clothing items and outfits are keyed by UUIDv7, which embeds a
//! millisecond timestamp in its leading bits so that id order follows
//! insertion order. At the HTTP/session boundary ids travel as strings;
//! [`parse_id`] converts them back and treats anything malformed as absent.

use uuid::Uuid;

/// Generate a new UUIDv7 identifier.
///
/// # Example
///
/// ```
/// use mismatch_core::ids::new_v7;
///
/// let id = new_v7();
/// assert_eq!(id.get_version_num(), 7);
/// ```
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}

/// Parse a boundary id string.
///
/// Surrounding whitespace is ignored. Returns `None` for anything that is
/// not a UUID, so lookups can report "does not exist" instead of failing.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Uuid::parse_str(trimmed).ok()
}
