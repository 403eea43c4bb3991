//! Domain-specific error types.
//!
//! - **IngestError**: catalog ingestion (preconditions, RDF loading, storage)
//! - **QueryError**: the observation query surface and the read-only REST
//!   listings. Every variant carries an HTTP status classification so the
//!   server can turn it into a structured body.

pub mod ingest;
pub mod query;

pub use ingest::IngestError;
pub use query::QueryError;

/// Result type alias for catalog ingestion
pub type IngestResult<T> = Result<T, IngestError>;

/// Result type alias for observation queries
pub type QueryResult<T> = Result<T, QueryError>;
