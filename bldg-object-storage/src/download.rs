//! Idempotent object download into a local directory.
//!
//! A file is fetched only when nothing exists at the destination. The object is
//! streamed into a temporary file next to the destination and published with a
//! no-clobber rename, so the check and the create happen as one step and a
//! concurrent writer can never be overwritten.

use std::{io::ErrorKind, path::Path as LocalPath};

use futures::StreamExt;
use object_store::path::Path;
use tokio::io::AsyncWriteExt;

use crate::{RemoteBucket, StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadResult {
    /// The object was fetched and written; carries the number of bytes.
    Downloaded(u64),
    /// A file already existed at the destination and was left untouched.
    AlreadyPresent,
}

/// Download `key` from `bucket` to `destination` unless a file is already there.
///
/// Existence is the only check: the content of a pre-existing file is never
/// compared with the remote object. The parent directory of `destination` must
/// exist.
pub async fn download_if_absent(
    bucket: &RemoteBucket,
    key: &str,
    destination: &LocalPath,
) -> Result<DownloadResult, StorageError> {
    if tokio::fs::try_exists(destination).await? {
        return Ok(DownloadResult::AlreadyPresent);
    }

    let location = Path::parse(key).map_err(|source| StorageError::InvalidKey {
        key: key.to_string(),
        source,
    })?;
    let directory = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => LocalPath::new("."),
    };

    let get_result = bucket.store().get(&location).await?;

    let partial = tempfile::Builder::new()
        .prefix(".bldg-")
        .suffix(".part")
        .tempfile_in(directory)?;
    let mut file = tokio::fs::File::from_std(partial.as_file().try_clone()?);

    let mut written: u64 = 0;
    let mut chunks = get_result.into_stream();
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    match partial.persist_noclobber(destination) {
        Ok(_) => {
            tracing::debug!(key, path = %destination.display(), bytes = written, "Object written");
            Ok(DownloadResult::Downloaded(written))
        }
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
            tracing::debug!(
                key,
                path = %destination.display(),
                "Another writer published the file first"
            );
            Ok(DownloadResult::AlreadyPresent)
        }
        Err(e) => Err(e.into()),
    }
}
