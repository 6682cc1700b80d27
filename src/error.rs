//! Error types for catalog loading and query validation

use std::path::PathBuf;
use thiserror::Error;

/// Raised while building or loading a catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("duplicate product id: {0}")]
    DuplicateId(String),

    #[error("product at position {0} has an empty id")]
    EmptyId(usize),

    #[error("unknown {field} value: {value:?}")]
    UnknownVariant { field: &'static str, value: String },

    #[error("invalid interestRate {value:?} for product {id}")]
    InvalidRate { id: String, value: String },

    #[error("unsupported catalog format: {0:?} (expected .json or .csv)")]
    UnsupportedFormat(PathBuf),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Raised when a filter request cannot be turned into typed criteria
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("{param} must be a finite number, got {value:?}")]
    InvalidNumber { param: &'static str, value: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;
