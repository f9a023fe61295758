use derive_getters::Getters;
use log::info;
use thiserror::Error;

use crate::drive::{DriveIndex, IndexError};

use super::{Destination, FileArrival};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("no upload folder configured")]
    NoDestinationConfigured,
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// The record handed to the drive index for one arrived file. Built once per
/// file event and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct IngestedFile {
    name: String,
    parent_folder_id: String,
    transfer_ref: i64,
    size_bytes: u64,
}

/// Registers one arrived file under the destination as it stood when the
/// file event was dispatched. Exactly one `register_file` call, no retries;
/// an unset destination fails before the index is touched.
pub async fn ingest_file<D: DriveIndex>(
    index: &D,
    destination: Option<Destination>,
    arrival: &FileArrival,
) -> Result<IngestedFile, IngestError> {
    let destination = destination.ok_or(IngestError::NoDestinationConfigured)?;

    let file = IngestedFile {
        name: arrival.display_name(),
        parent_folder_id: destination.folder_id().clone(),
        transfer_ref: arrival.transfer_ref(),
        size_bytes: arrival.size_bytes(),
    };
    index
        .register_file(
            file.parent_folder_id(),
            file.name(),
            file.transfer_ref(),
            file.size_bytes(),
        )
        .await?;
    info!(
        "registered {} ({} bytes) under {}",
        file.name(),
        file.size_bytes(),
        destination.folder_name()
    );

    Ok(file)
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use crate::{
        drive::{FailingIndex, FolderCandidate, InMemoryIndex},
        router::{CurrentFolder, MediaKind},
    };

    use super::*;

    #[fixture]
    fn destination() -> Option<Destination> {
        let mut current_folder = CurrentFolder::default();
        current_folder.commit(&FolderCandidate::fake("a", "Docs", "/team/a"));
        current_folder.get()
    }

    #[rstest]
    #[tokio::test]
    async fn test_unset_destination_registers_nothing() {
        let index = InMemoryIndex::new(vec![]);
        let arrival = FileArrival::new(1, Some("notes.txt".into()), MediaKind::Document, 10);

        let result = ingest_file(&index, None, &arrival).await;

        assert_matches!(result, Err(IngestError::NoDestinationConfigured));
        assert!(index.registered_files().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_file_is_registered_under_the_snapshotted_folder(
        destination: Option<Destination>,
    ) {
        let index = InMemoryIndex::new(vec![]);
        let arrival = FileArrival::new(7, Some("notes.txt".into()), MediaKind::Document, 10);

        let file = assert_ok!(ingest_file(&index, destination, &arrival).await);

        assert_eq!("notes.txt", file.name());
        assert_eq!("a", file.parent_folder_id());
        let registered = index.registered_files();
        assert_eq!(1, registered.len());
        assert_eq!("a", registered[0].parent_folder_id);
        assert_eq!(7, registered[0].transfer_ref);
        assert_eq!(10, registered[0].size_bytes);
    }

    #[rstest]
    #[tokio::test]
    async fn test_nameless_photo_gets_synthesized_name(destination: Option<Destination>) {
        let index = InMemoryIndex::new(vec![]);
        let arrival = FileArrival::new(42, None, MediaKind::Photo, 2048);

        let file = assert_ok!(ingest_file(&index, destination, &arrival).await);

        assert_eq!("photo_42.jpg", file.name());
        assert_eq!("photo_42.jpg", index.registered_files()[0].name);
    }

    #[rstest]
    #[tokio::test]
    async fn test_index_rejection_is_surfaced(destination: Option<Destination>) {
        let arrival = FileArrival::new(1, Some("notes.txt".into()), MediaKind::Document, 10);

        let result = ingest_file(&FailingIndex, destination, &arrival).await;

        assert_matches!(result, Err(IngestError::Index(_)));
    }
}
