use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use bldg_common::CountryCode;
use bldg_config::FOOTPRINT_KEY_PREFIX;
use bldg_object_storage::{download_if_absent, list_keys, DownloadResult, RemoteBucket};

pub mod block_size;
pub mod collection;
pub mod error;
pub mod report;

pub use block_size::BlockSize;
pub use collection::FootprintCollection;
pub use error::FootprintError;
pub use report::{DownloadReport, KeyReport, KeyStatus};

/// Key prefix of one country's footprint partitions.
pub fn footprint_prefix(country: &CountryCode) -> String {
    format!("{}{}", FOOTPRINT_KEY_PREFIX, country)
}

/// Result of a footprint fetch: the lazy collection plus what happened to each key.
#[derive(Debug, Clone)]
pub struct FootprintFetch {
    pub collection: FootprintCollection,
    pub report: DownloadReport,
}

/// Pull-once cache of remote footprint files in a local directory.
///
/// Files are never refreshed, validated or evicted once present.
#[derive(Debug, Clone)]
pub struct FootprintCache {
    bucket: RemoteBucket,
    local_dir: PathBuf,
    block_size: BlockSize,
}

impl FootprintCache {
    pub fn new(bucket: RemoteBucket, local_dir: impl Into<PathBuf>, block_size: BlockSize) -> Self {
        Self {
            bucket,
            local_dir: local_dir.into(),
            block_size,
        }
    }

    /// Source Cooperative bucket, `BLDG_DATA_DIR` and `BLDG_BLOCK_SIZE`.
    pub fn from_config() -> Result<Self, FootprintError> {
        Ok(Self::new(
            RemoteBucket::source_cooperative()?,
            bldg_config::CONFIG.data_dir.clone(),
            BlockSize::from_config()?,
        ))
    }

    pub fn local_dir(&self) -> &Path {
        &self.local_dir
    }

    pub fn block_size(&self) -> BlockSize {
        self.block_size
    }

    /// List the country's remote files, download the missing ones and return
    /// a lazy collection over everything cached for that country.
    ///
    /// Listing and directory preparation fail fast. Per-key download faults are
    /// recorded in the report and never stop the batch.
    pub async fn fetch(&self, country: &CountryCode) -> Result<FootprintFetch, FootprintError> {
        let prefix = footprint_prefix(country);
        let keys = list_keys(&self.bucket, &prefix).await?;
        tracing::info!(
            %country,
            bucket = self.bucket.name(),
            "Found {} remote file(s)",
            keys.len()
        );

        let report = self.download_keys(&keys).await?;
        tracing::info!(%country, "Footprint download finished: {}", report);

        Ok(FootprintFetch {
            collection: FootprintCollection::new(&self.local_dir, country, self.block_size),
            report,
        })
    }

    /// Download each key not yet cached, one at a time in the given order.
    pub async fn download_keys(&self, keys: &[String]) -> Result<DownloadReport, FootprintError> {
        ensure_directory(&self.local_dir).await?;

        let mut report = DownloadReport::default();
        for key in keys {
            report.push(self.download_key(key).await);
        }
        Ok(report)
    }

    async fn download_key(&self, key: &str) -> KeyReport {
        let file_name = key.rsplit('/').next().unwrap_or_default();
        let local_path = self.local_dir.join(file_name);
        if file_name.is_empty() {
            tracing::error!(key, "Key has no file name, skipping");
            return KeyReport {
                key: key.to_string(),
                local_path,
                status: KeyStatus::FatalFault("key has no file name".to_string()),
            };
        }

        tracing::debug!(key, path = %local_path.display(), "Ensuring file is cached");
        let status = match download_if_absent(&self.bucket, key, &local_path).await {
            Ok(DownloadResult::Downloaded(bytes)) => {
                tracing::info!(key, bytes, "Download complete.");
                KeyStatus::Downloaded { bytes }
            }
            Ok(DownloadResult::AlreadyPresent) => {
                tracing::info!(key, "File already exists locally. No download needed.");
                KeyStatus::AlreadyCached
            }
            Err(e) => {
                let status = KeyStatus::from_error(&e);
                match &status {
                    KeyStatus::NotFound => {
                        tracing::warn!(key, "The specified key does not exist in the bucket.")
                    }
                    _ => tracing::error!(key, "An error occurred: {}", e),
                }
                status
            }
        };

        KeyReport {
            key: key.to_string(),
            local_path,
            status,
        }
    }
}

/// Create `path` if missing. Only the last component is created; a missing parent is an error.
async fn ensure_directory(path: &Path) -> Result<(), FootprintError> {
    match tokio::fs::create_dir(path).await {
        Ok(()) => {
            tracing::info!("Created cache directory {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => match tokio::fs::metadata(path).await {
            Ok(metadata) if metadata.is_dir() => Ok(()),
            _ => Err(FootprintError::CacheDirectory {
                path: path.to_path_buf(),
                source: e,
            }),
        },
        Err(source) => Err(FootprintError::CacheDirectory {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Fetch the footprints of `country` into `local_path`.
///
/// `block_size` defaults to 256M.
pub async fn fetch_footprints(
    country: &CountryCode,
    bucket: &RemoteBucket,
    local_path: impl AsRef<Path>,
    block_size: Option<BlockSize>,
) -> Result<FootprintFetch, FootprintError> {
    FootprintCache::new(
        bucket.clone(),
        local_path.as_ref(),
        block_size.unwrap_or_default(),
    )
    .fetch(country)
    .await
}
