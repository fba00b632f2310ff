#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("Object store error: {0}")]
    ObjectStoreError(#[from] object_store::Error),
    #[error("Invalid object key {key:?}: {source}")]
    InvalidKey {
        key: String,
        #[source]
        source: object_store::path::Error,
    },
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to persist downloaded file: {0}")]
    PersistError(#[from] tempfile::PersistError),
    #[error("Initialization error: {0}")]
    InitializationError(String),
}

impl StorageError {
    /// Whether the remote object does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::ObjectStoreError(object_store::Error::NotFound { .. })
        )
    }
}
