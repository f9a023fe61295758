use std::fmt::{self, Display, Formatter};

use derive_getters::Getters;

use super::Token;

/// Identifies one conversation with the transport. Interactions are keyed by
/// chat: two operators in different chats run independent dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(i64);

impl From<i64> for ChatId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for ChatId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    SetFolder,
    CurrentFolder,
}

impl Command {
    /// Maps a leading-slash command word to a [`Command`]. Unknown commands
    /// are `None` and get ignored by the dispatcher.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "/start" | "/help" => Some(Self::Help),
            "/set_folder" => Some(Self::SetFolder),
            "/current_folder" => Some(Self::CurrentFolder),
            _ => None,
        }
    }
}

/// Closed set of media kinds a file arrival can carry. Each variant owns the
/// fallback-name rule applied when the transport supplies no file name, so a
/// new kind cannot be added without deciding its rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Document,
    Video,
    Audio,
    Photo,
    Sticker,
}

impl MediaKind {
    pub fn fallback_name(self, transfer_ref: i64) -> String {
        match self {
            Self::Photo => format!("photo_{transfer_ref}.jpg"),
            Self::Sticker => format!("sticker_{transfer_ref}.webp"),
            Self::Video => format!("video_{transfer_ref}"),
            Self::Audio => format!("audio_{transfer_ref}"),
            Self::Document => format!("file_{transfer_ref}"),
        }
    }
}

/// One incoming file notification. `transfer_ref` is the transport's opaque
/// handle to the stored bytes; the core never touches the bytes themselves.
#[derive(Debug, Clone, Getters)]
pub struct FileArrival {
    transfer_ref: i64,
    raw_name: Option<String>,
    media_kind: MediaKind,
    size_bytes: u64,
}

impl FileArrival {
    pub fn new(
        transfer_ref: i64,
        raw_name: Option<String>,
        media_kind: MediaKind,
        size_bytes: u64,
    ) -> Self {
        Self {
            transfer_ref,
            raw_name,
            media_kind,
            size_bytes,
        }
    }

    /// Name resolution policy: the supplied name when present and non-empty,
    /// otherwise the media kind's synthesized name. Never empty.
    pub fn display_name(&self) -> String {
        match self.raw_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => self.media_kind.fallback_name(self.transfer_ref),
        }
    }
}

/// Inbound event stream of the dispatcher, delivered exactly once per
/// logical event by the transport adapter.
#[derive(Debug, Clone)]
pub enum Event {
    Command {
        chat: ChatId,
        command: Command,
    },
    /// Free-text reply; only consumed while `chat` awaits a folder name.
    Reply {
        chat: ChatId,
        text: String,
    },
    /// A button press carrying the payload encoded into the choice.
    Selection {
        chat: ChatId,
        token: Token,
        candidate_id: String,
    },
    FileArrival {
        chat: ChatId,
        file: FileArrival,
    },
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;

    #[rstest]
    #[case("/help", Some(Command::Help))]
    #[case("/start", Some(Command::Help))]
    #[case("/set_folder", Some(Command::SetFolder))]
    #[case("/current_folder", Some(Command::CurrentFolder))]
    #[case("/unknown", None)]
    #[case("hello", None)]
    fn test_command_parse(#[case] text: &str, #[case] expected: Option<Command>) {
        assert_eq!(expected, Command::parse(text));
    }

    #[rstest]
    fn test_display_name_prefers_supplied_name() {
        let arrival = FileArrival::new(7, Some("notes.txt".into()), MediaKind::Document, 10);

        assert_eq!("notes.txt", arrival.display_name());
    }

    #[rstest]
    fn test_display_name_synthesizes_photo_name() {
        let arrival = FileArrival::new(42, None, MediaKind::Photo, 2048);

        assert_eq!("photo_42.jpg", arrival.display_name());
    }

    #[rstest]
    #[case(MediaKind::Sticker, "sticker_9.webp")]
    #[case(MediaKind::Video, "video_9")]
    #[case(MediaKind::Audio, "audio_9")]
    #[case(MediaKind::Document, "file_9")]
    fn test_display_name_has_a_rule_per_media_kind(
        #[case] kind: MediaKind,
        #[case] expected: &str,
    ) {
        let arrival = FileArrival::new(9, Some("   ".into()), kind, 0);

        assert_eq!(expected, arrival.display_name());
    }
}
