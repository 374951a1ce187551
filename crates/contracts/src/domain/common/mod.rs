//! Common types for all aggregates

pub mod entity_metadata;
pub mod origin;

// Re-exports
pub use entity_metadata::EntityMetadata;
pub use origin::Origin;
