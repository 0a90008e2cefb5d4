//! Service layer for business logic.

pub mod outfit_composer;

pub use outfit_composer::{ComposerConfig, OutfitComposer};
