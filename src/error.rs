//! Error types for reference-table and bill loading.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Failures while loading or sanity-checking a reference tables file.
pub enum TableError {
    #[error("tables file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read tables file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("tables file {} is not valid {format}: {detail}", path.display())]
    Parse {
        path: PathBuf,
        format: &'static str,
        detail: String,
    },
    #[error("equivalence set '{0}' must list at least two codes")]
    EquivalenceSetTooSmall(String),
    #[error("benchmark price for {code} must be positive (got {price})")]
    NonPositiveBenchmark { code: String, price: f64 },
}

#[derive(Debug, Error)]
/// Failures while obtaining a structured bill.
pub enum BillError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{origin}: not a valid structured bill: {detail}")]
    Parse { origin: String, detail: String },
}

#[derive(Debug, Error)]
#[error("{0}")]
/// Error reported by a line-item store collaborator.
pub struct StoreError(pub String);
