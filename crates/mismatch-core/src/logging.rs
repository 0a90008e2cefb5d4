//! Structured logging conventions.
//!
//! Every event carries a `subsystem` field and, below the composer, a
//! `component` field, taken from the constants here so log queries match the
//! same values across crates. Other field names in use: `op`, `outfit_id`,
//! `item_id`, `owner_id`, `category`, `duration_ms`, `result_count`,
//! `missing_items`, `error`.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration |

// ─── Subsystems ────────────────────────────────────────────────────────────

/// HTTP layer.
pub const SUBSYSTEM_API: &str = "api";

/// Outfit composer and the store deadline.
pub const SUBSYSTEM_COMPOSER: &str = "composer";

/// Storage backends.
pub const SUBSYSTEM_DATABASE: &str = "database";

// ─── Components ────────────────────────────────────────────────────────────

pub const COMPONENT_OUTFITS: &str = "outfits";
pub const COMPONENT_CLOTHING: &str = "clothing";
pub const COMPONENT_POOL: &str = "pool";
pub const COMPONENT_MEMORY: &str = "memory";
pub const COMPONENT_DEADLINE: &str = "deadline";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsystem_values_are_distinct() {
        let all = [SUBSYSTEM_API, SUBSYSTEM_COMPOSER, SUBSYSTEM_DATABASE];
        let unique: std::collections::HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
    }
}
