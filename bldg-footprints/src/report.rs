use std::{fmt::Display, path::PathBuf};

use bldg_object_storage::StorageError;

/// Outcome of one key in a download batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyStatus {
    Downloaded { bytes: u64 },
    /// A file of the same name was already in the cache directory.
    AlreadyCached,
    /// The key was listed but the store no longer has it.
    NotFound,
    /// A store fault that may go away on a later attempt.
    TransientFault(String),
    /// A fault that will repeat on every attempt.
    FatalFault(String),
}

impl KeyStatus {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            KeyStatus::NotFound | KeyStatus::TransientFault(_) | KeyStatus::FatalFault(_)
        )
    }

    pub(crate) fn from_error(error: &StorageError) -> Self {
        if error.is_not_found() {
            return KeyStatus::NotFound;
        }
        match error {
            StorageError::ObjectStoreError(object_store::Error::Generic { .. }) => {
                KeyStatus::TransientFault(error.to_string())
            }
            StorageError::IoError(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::TimedOut
                        | std::io::ErrorKind::Interrupted
                        | std::io::ErrorKind::ConnectionReset
                        | std::io::ErrorKind::ConnectionAborted
                ) =>
            {
                KeyStatus::TransientFault(error.to_string())
            }
            _ => KeyStatus::FatalFault(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReport {
    pub key: String,
    pub local_path: PathBuf,
    pub status: KeyStatus,
}

/// Per-key outcomes of a download batch, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    entries: Vec<KeyReport>,
}

impl DownloadReport {
    pub(crate) fn push(&mut self, entry: KeyReport) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[KeyReport] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of keys fetched from the store during this batch.
    pub fn download_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, KeyStatus::Downloaded { .. }))
            .count()
    }

    pub fn cached_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status == KeyStatus::AlreadyCached)
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &KeyReport> {
        self.entries.iter().filter(|e| e.status.is_failure())
    }

    /// True when every listed key is now present locally.
    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }
}

impl Display for DownloadReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} key(s): {} downloaded, {} cached, {} failed",
            self.len(),
            self.download_count(),
            self.cached_count(),
            self.failures().count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, status: KeyStatus) -> KeyReport {
        KeyReport {
            key: key.to_string(),
            local_path: PathBuf::from(key),
            status,
        }
    }

    #[test]
    fn counts_by_status() {
        let mut report = DownloadReport::default();
        report.push(entry("a", KeyStatus::Downloaded { bytes: 3 }));
        report.push(entry("b", KeyStatus::AlreadyCached));
        report.push(entry("c", KeyStatus::NotFound));
        report.push(entry("d", KeyStatus::TransientFault("timeout".to_string())));

        assert_eq!(report.download_count(), 1);
        assert_eq!(report.cached_count(), 1);
        let failed: Vec<&str> = report.failures().map(|e| e.key.as_str()).collect();
        assert_eq!(failed, vec!["c", "d"]);
        assert!(!report.is_complete());
        assert_eq!(
            report.to_string(),
            "4 key(s): 1 downloaded, 1 cached, 2 failed"
        );
    }

    #[test]
    fn empty_report_is_complete() {
        assert!(DownloadReport::default().is_complete());
    }

    #[test]
    fn storage_errors_are_classified() {
        let not_found = StorageError::ObjectStoreError(object_store::Error::NotFound {
            path: "k".to_string(),
            source: "gone".into(),
        });
        assert_eq!(KeyStatus::from_error(&not_found), KeyStatus::NotFound);

        let generic = StorageError::ObjectStoreError(object_store::Error::Generic {
            store: "S3",
            source: "connection reset".into(),
        });
        assert!(matches!(
            KeyStatus::from_error(&generic),
            KeyStatus::TransientFault(_)
        ));

        let denied = StorageError::IoError(std::io::Error::from(
            std::io::ErrorKind::PermissionDenied,
        ));
        assert!(matches!(
            KeyStatus::from_error(&denied),
            KeyStatus::FatalFault(_)
        ));
    }
}
