use derive_getters::Getters;

use super::{DriveIndex, EntryKind, IndexError};

/// A folder eligible for selection. `path` is the full path of the folder
/// itself: the stored ancestor path joined with the folder's id, normalized
/// to a single leading separator and no trailing one. It is computed fresh
/// from the index at search time and never cached across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct FolderCandidate {
    id: String,
    name: String,
    path: String,
}

impl FolderCandidate {
    #[cfg(test)]
    pub fn fake(id: &str, name: &str, path: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Queries the index and keeps only folder entries. An empty result is a
/// normal outcome, not an error.
pub async fn search_folders<D: DriveIndex>(
    index: &D,
    query: &str,
) -> Result<Vec<FolderCandidate>, IndexError> {
    let entries = index.search(query).await?;
    Ok(entries
        .into_iter()
        .filter(|entry| *entry.kind() == EntryKind::Folder)
        .map(|entry| FolderCandidate {
            path: folder_path(entry.path(), entry.id()),
            id: entry.id().clone(),
            name: entry.name().clone(),
        })
        .collect())
}

fn folder_path(ancestor: &str, id: &str) -> String {
    let joined = format!("{}/{id}", ancestor.trim_matches('/'));
    format!("/{}", joined.trim_matches('/'))
}
