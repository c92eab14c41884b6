//! Catalog error types

use std::path::PathBuf;

/// Errors while reading catalog input
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Input is not a group map
    #[error("invalid catalog json: {0}")]
    Json(#[from] serde_json::Error),

    /// Catalog file could not be read
    #[error("io error reading {}: {source}", path.display())]
    Io {
        /// Catalog path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}
