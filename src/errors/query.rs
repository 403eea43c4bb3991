//! Observation query errors
//!
//! # Examples
//!
//! ```rust
//! use fairdatacenter::errors::QueryError;
//!
//! let err = QueryError::FileNotRegistered {
//!     dataset_id: "dc-2025".to_string(),
//!     filename: "cpu.csv".to_string(),
//! };
//! assert_eq!(err.status_code(), 404);
//! ```

use thiserror::Error;

pub const EXAMPLE_FILES_HINT: &str = "cpu.csv, mem.csv, diskio.csv, net.csv, ipmi_sensor.csv, etc.";

#[derive(Error, Debug)]
pub enum QueryError {
    /// No dataset with this identifier
    #[error("Dataset {0} not found")]
    DatasetNotFound(String),

    /// The file is not registered as a distribution of the dataset
    #[error("File {filename} is not part of dataset {dataset_id}")]
    FileNotRegistered { dataset_id: String, filename: String },

    /// Registered (or requested) file is absent from the data directory
    #[error("File {0} not found on disk")]
    FileMissingOnDisk(String),

    /// File-level query without a `file` parameter
    #[error("Missing 'file' parameter. Available files: {}", EXAMPLE_FILES_HINT)]
    MissingFileParameter,

    /// A query parameter could not be interpreted
    #[error("Invalid value for '{name}': {value}")]
    InvalidParameter { name: String, value: String },

    /// The backing file could not be read or parsed
    #[error("Error reading file: {0}")]
    Read(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl QueryError {
    pub fn invalid(name: impl Into<String>, value: impl Into<String>) -> Self {
        QueryError::InvalidParameter {
            name: name.into(),
            value: value.into(),
        }
    }

    /// HTTP status classification for the structured error body
    pub fn status_code(&self) -> u16 {
        match self {
            QueryError::DatasetNotFound(_)
            | QueryError::FileNotRegistered { .. }
            | QueryError::FileMissingOnDisk(_) => 404,
            QueryError::MissingFileParameter | QueryError::InvalidParameter { .. } => 400,
            QueryError::Read(_) | QueryError::Database(_) => 500,
        }
    }
}

impl From<csv::Error> for QueryError {
    fn from(err: csv::Error) -> Self {
        QueryError::Read(err.to_string())
    }
}

impl From<std::io::Error> for QueryError {
    fn from(err: std::io::Error) -> Self {
        QueryError::Read(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(QueryError::DatasetNotFound("x".into()).status_code(), 404);
        assert_eq!(QueryError::FileMissingOnDisk("cpu.csv".into()).status_code(), 404);
        assert_eq!(QueryError::MissingFileParameter.status_code(), 400);
        assert_eq!(QueryError::invalid("limit", "abc").status_code(), 400);
        assert_eq!(QueryError::Read("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_missing_file_hint_lists_examples() {
        let message = QueryError::MissingFileParameter.to_string();
        assert!(message.contains("cpu.csv"));
        assert!(message.contains("ipmi_sensor.csv"));
    }
}
