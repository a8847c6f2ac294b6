/// Error types for loading a recipe dataset.
///
/// Only load-time failures are errors. Malformed cells and unusable rows degrade
/// silently into best-effort output or a rejected row; query misses are `None` or
/// empty results.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("dataset file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("no usable recipes in {} ({rows_read} rows read)", .path.display())]
    Empty { path: PathBuf, rows_read: usize },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
