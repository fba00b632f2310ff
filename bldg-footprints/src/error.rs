use std::path::PathBuf;

use bldg_object_storage::StorageError;
use datafusion::error::DataFusionError;

#[derive(thiserror::Error, Debug)]
pub enum FootprintError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
    #[error("Failed to prepare cache directory {}: {source}", path.display())]
    CacheDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid glob pattern: {0}")]
    PatternError(#[from] glob::PatternError),
    #[error("Invalid block size {0:?}")]
    InvalidBlockSize(String),
    #[error("DataFusion error: {0}")]
    DataFusionError(#[from] DataFusionError),
}
