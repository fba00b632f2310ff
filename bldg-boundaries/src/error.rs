use bldg_object_storage::StorageError;

#[derive(thiserror::Error, Debug)]
pub enum BoundaryError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
    #[error("Failed to read archive: {0}")]
    ZipError(#[from] zip::result::ZipError),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse GeoJSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Archive contains no GeoJSON file")]
    EmptyArchive,
    #[error("Expected a FeatureCollection, found a {0}")]
    UnexpectedGeoJson(&'static str),
    #[error("Column {0:?} not found")]
    MissingColumn(String),
    #[error("Column {0:?} already exists")]
    DuplicateColumn(String),
    #[error("Boundary parsing task failed: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

impl From<object_store::Error> for BoundaryError {
    fn from(e: object_store::Error) -> Self {
        BoundaryError::StorageError(e.into())
    }
}

impl BoundaryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BoundaryError::StorageError(e) if e.is_not_found())
    }
}
