use std::{fmt::Display, sync::Arc};

use bldg_config::Config;
use futures::StreamExt;
use object_store::{aws::AmazonS3Builder, http::HttpBuilder, path::Path, ObjectStore};

pub mod download;
pub mod error;

pub use download::{download_if_absent, DownloadResult};
pub use error::StorageError;

/// A bucket name paired with the client that reads from it.
#[derive(Debug, Clone)]
pub struct RemoteBucket {
    name: String,
    store: Arc<dyn ObjectStore>,
}

impl RemoteBucket {
    pub fn new(name: impl Into<String>, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            name: name.into(),
            store,
        }
    }

    /// The footprint bucket on Source Cooperative, configured from the environment.
    pub fn source_cooperative() -> Result<Self, StorageError> {
        Self::s3(bldg_config::FOOTPRINT_BUCKET, &bldg_config::CONFIG)
    }

    pub fn s3(bucket_name: &str, config: &Config) -> Result<Self, StorageError> {
        tracing::info!(
            "Using S3 object store for bucket {} at {}",
            bucket_name,
            config.s3_endpoint
        );
        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket_name)
            .with_endpoint(&config.s3_endpoint)
            .with_region(&config.s3_region)
            .with_allow_http(config.s3_allow_http)
            .with_skip_signature(config.s3_skip_signature)
            .build()
            .map_err(|e| {
                StorageError::InitializationError(format!("Failed to build S3 object store: {}", e))
            })?;

        Ok(Self::new(bucket_name, Arc::new(store)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }
}

impl Display for RemoteBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RemoteBucket({})", self.name)
    }
}

/// Read-only store rooted at `base_url`; object paths are appended to it for each GET.
pub fn http_object_store(base_url: &str) -> Result<Arc<dyn ObjectStore>, StorageError> {
    let store = HttpBuilder::new().with_url(base_url).build().map_err(|e| {
        StorageError::InitializationError(format!(
            "Failed to build HTTP object store for {}: {}",
            base_url, e
        ))
    })?;
    Ok(Arc::new(store))
}

/// List every key starting with `prefix`, in the order the store returns them.
///
/// `prefix` is matched as a plain string, as S3 does, so it may end inside a
/// path segment. The listing stream follows continuation tokens, so all pages
/// are read. An empty listing is an empty result. Any transport fault is
/// returned as is.
pub async fn list_keys(bucket: &RemoteBucket, prefix: &str) -> Result<Vec<String>, StorageError> {
    let parent = prefix.rfind('/').map(|i| Path::from(&prefix[..i]));
    let mut entries = bucket.store.list(parent.as_ref());

    let mut keys = Vec::new();
    while let Some(entry) = entries.next().await {
        let location = entry?.location;
        if location.as_ref().starts_with(prefix) {
            keys.push(location.to_string());
        }
    }

    tracing::debug!(
        bucket = bucket.name(),
        prefix,
        "Listed {} object(s)",
        keys.len()
    );
    Ok(keys)
}
