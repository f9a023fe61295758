mod index;
mod memory;
mod search;

pub use index::DriveEntry;
pub use index::DriveIndex;
pub use index::EntryKind;
pub use index::IndexError;
#[cfg(test)]
pub use memory::FailingIndex;
pub use memory::InMemoryIndex;
pub use memory::RegisteredFile;
pub use search::FolderCandidate;
pub use search::search_folders;
