//! Catalog ingestion errors
//!
//! Precondition failures abort a run before anything is written. Soft data
//! quality problems (bad dates, missing optional triples) never surface as
//! errors; the loader substitutes defaults instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    /// The catalog document does not exist
    #[error("Catalog file not found: {}", .0.display())]
    CatalogNotFound(PathBuf),

    /// The data directory does not exist
    #[error("Datasets directory not found: {}", .0.display())]
    DatasetsDirNotFound(PathBuf),

    /// The catalog could not be parsed as Turtle
    #[error("Failed to load RDF catalog: {0}")]
    RdfLoad(String),

    /// A seeded sensor type is missing from the store
    #[error("Sensor type {0} is not seeded")]
    MissingSensorType(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::CatalogNotFound(PathBuf::from("/tmp/catalog.ttl"));
        assert_eq!(err.to_string(), "Catalog file not found: /tmp/catalog.ttl");
    }
}
