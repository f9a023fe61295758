use derive_getters::Getters;

use crate::drive::FolderCandidate;

/// The single process-wide upload destination. Owned by the router and
/// mutated only through [`CurrentFolder::commit`], so commits apply in
/// processing order and the last one wins.
#[derive(Debug, Default)]
pub struct CurrentFolder {
    destination: Option<Destination>,
}

#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Destination {
    folder_id: String,
    folder_name: String,
    folder_path: String,
}

impl CurrentFolder {
    pub fn commit(&mut self, candidate: &FolderCandidate) {
        self.destination = Some(Destination {
            folder_id: candidate.id().clone(),
            folder_name: candidate.name().clone(),
            folder_path: candidate.path().clone(),
        });
    }

    /// Snapshot of the destination as it stands right now. Ingestion clones
    /// it per file event; a later commit never reassigns an ingested file.
    pub fn get(&self) -> Option<Destination> {
        self.destination.clone()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.destination
            .as_ref()
            .map(|destination| destination.folder_name().as_str())
    }
}
