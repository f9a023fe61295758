use log::info;

use crate::drive::{DriveIndex, FolderCandidate, IndexError, search_folders};

use super::{Choice, CurrentFolder, Resolution, SessionCache, Token};

/// What to do with a folder-name reply.
#[derive(Debug, PartialEq, Eq)]
pub enum ReplyAction {
    Cancelled,
    NoMatch,
    Present { token: Token, choices: Vec<Choice> },
}

/// Second protocol step: a free-text reply came in while the chat awaited a
/// folder name. A cancel keyword or an empty search result ends the dialog
/// without creating a session; otherwise the matches become one session and
/// one choice per candidate, with the session token encoded into every
/// choice payload.
pub async fn handle_folder_name<D: DriveIndex>(
    index: &D,
    sessions: &mut SessionCache,
    cancel_keyword: &str,
    text: &str,
) -> Result<ReplyAction, IndexError> {
    let text = text.trim();
    if text.eq_ignore_ascii_case(cancel_keyword) {
        return Ok(ReplyAction::Cancelled);
    }

    let candidates = search_folders(index, text).await?;
    if candidates.is_empty() {
        return Ok(ReplyAction::NoMatch);
    }

    let token = sessions.create(candidates.clone());
    let choices = candidates
        .into_iter()
        .map(|candidate| Choice {
            label: candidate.name().clone(),
            token,
            candidate_id: candidate.id().clone(),
        })
        .collect();
    Ok(ReplyAction::Present { token, choices })
}

#[derive(Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    Committed(FolderCandidate),
    Expired,
    Invalid,
}

/// Final protocol step: resolve the pressed choice and, on success, commit
/// the candidate as the new current folder. The session is consumed by the
/// resolve, so the same presentation can never commit twice.
pub fn commit_selection(
    sessions: &mut SessionCache,
    current_folder: &mut CurrentFolder,
    token: Token,
    candidate_id: &str,
) -> SelectOutcome {
    match sessions.resolve(token, candidate_id) {
        Resolution::Selected(candidate) => {
            current_folder.commit(&candidate);
            info!(
                "current folder set to {} ({})",
                candidate.name(),
                candidate.path()
            );
            SelectOutcome::Committed(candidate)
        }
        Resolution::Expired => SelectOutcome::Expired,
        Resolution::InvalidChoice => SelectOutcome::Invalid,
    }
}
