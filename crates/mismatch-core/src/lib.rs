//! # mismatch-core
//!
//! Core types, traits, and abstractions for the MisMatch wardrobe service.
//!
//! This crate provides the catalog and outfit data structures, the
//! repository traits every storage backend implements, and the shared
//! error type.

pub mod deadline;
pub mod defaults;
pub mod error;
pub mod ids;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use deadline::bounded;
pub use error::{Error, Result};
pub use ids::{new_v7, parse_id};
pub use models::*;
pub use traits::*;
