use derive_getters::Getters;
use thiserror::Error;

/// Errors surfaced by the drive index. They are reported to the operator
/// verbatim and never retried here; idempotence is the index's job.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("drive index rejected the request: {0}")]
    Rejected(String),
    #[error("drive index unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Folder,
    File,
}

/// One entry of the drive hierarchy as the index stores it. `path` is the
/// ancestor path of the entry, not including the entry itself.
#[derive(Debug, Clone, Getters)]
pub struct DriveEntry {
    id: String,
    name: String,
    kind: EntryKind,
    path: String,
}

impl DriveEntry {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: EntryKind,
        path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            path: path.into(),
        }
    }
}

/// System of record for the folder hierarchy and file metadata. Whether name
/// matching is exact or substring, case-sensitive or not, is index policy.
pub trait DriveIndex {
    async fn search(&self, query: &str) -> Result<Vec<DriveEntry>, IndexError>;

    async fn register_file(
        &self,
        parent_folder_id: &str,
        name: &str,
        transfer_ref: i64,
        size_bytes: u64,
    ) -> Result<(), IndexError>;
}

impl<D: DriveIndex> DriveIndex for &D {
    async fn search(&self, query: &str) -> Result<Vec<DriveEntry>, IndexError> {
        (**self).search(query).await
    }

    async fn register_file(
        &self,
        parent_folder_id: &str,
        name: &str,
        transfer_ref: i64,
        size_bytes: u64,
    ) -> Result<(), IndexError> {
        (**self)
            .register_file(parent_folder_id, name, transfer_ref, size_bytes)
            .await
    }
}
