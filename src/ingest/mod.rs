//! Catalog ingestion: Turtle catalog in, relational catalog rows out.

pub mod inference;
pub mod loader;
pub mod stats;

pub use loader::{CatalogLoader, EntityCounts, IngestFailure, IngestOptions, IngestReport};
