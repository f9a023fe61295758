use std::sync::Mutex;

use log::debug;

use super::{DriveEntry, DriveIndex, IndexError};

/// In-process stand-in for the real drive index, seeded with a snapshot of
/// the hierarchy. Name matching is a case-insensitive substring search.
pub struct InMemoryIndex {
    entries: Vec<DriveEntry>,
    registered: Mutex<Vec<RegisteredFile>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredFile {
    pub parent_folder_id: String,
    pub name: String,
    pub transfer_ref: i64,
    pub size_bytes: u64,
}

impl InMemoryIndex {
    pub fn new(entries: Vec<DriveEntry>) -> Self {
        Self {
            entries,
            registered: Mutex::new(Vec::new()),
        }
    }

    pub fn registered_files(&self) -> Vec<RegisteredFile> {
        self.registered
            .lock()
            .expect("registered files lock should not be poisoned")
            .clone()
    }
}

impl DriveIndex for InMemoryIndex {
    async fn search(&self, query: &str) -> Result<Vec<DriveEntry>, IndexError> {
        let query = query.to_lowercase();
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.name().to_lowercase().contains(&query))
            .cloned()
            .collect())
    }

    async fn register_file(
        &self,
        parent_folder_id: &str,
        name: &str,
        transfer_ref: i64,
        size_bytes: u64,
    ) -> Result<(), IndexError> {
        debug!("registering {name} under folder {parent_folder_id}");
        self.registered
            .lock()
            .expect("registered files lock should not be poisoned")
            .push(RegisteredFile {
                parent_folder_id: parent_folder_id.to_owned(),
                name: name.to_owned(),
                transfer_ref,
                size_bytes,
            });
        Ok(())
    }
}

/// Index double that fails every call, for exercising error surfacing.
#[cfg(test)]
pub struct FailingIndex;

#[cfg(test)]
impl DriveIndex for FailingIndex {
    async fn search(&self, _query: &str) -> Result<Vec<DriveEntry>, IndexError> {
        Err(IndexError::Unavailable("index offline".into()))
    }

    async fn register_file(
        &self,
        _parent_folder_id: &str,
        _name: &str,
        _transfer_ref: i64,
        _size_bytes: u64,
    ) -> Result<(), IndexError> {
        Err(IndexError::Rejected("quota exceeded".into()))
    }
}
