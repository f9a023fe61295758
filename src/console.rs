use log::debug;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};

use crate::router::{
    ChatId, Choice, Command, Event, FileArrival, MediaKind, Token, Transport, TransportError,
};

/// The single conversation a console run represents.
const CONSOLE_CHAT: i64 = 0;

/// Line-oriented local transport: outbound messages go to stdout, choices
/// are printed with the `pick` payload to type back. Stands in for the real
/// messaging transport during local runs.
pub struct ConsoleTransport;

impl Transport for ConsoleTransport {
    async fn send_text(&self, _chat: ChatId, text: &str) -> Result<(), TransportError> {
        println!("{text}");
        Ok(())
    }

    async fn send_choices(
        &self,
        _chat: ChatId,
        text: &str,
        choices: &[Choice],
    ) -> Result<(), TransportError> {
        println!("{text}");
        for choice in choices {
            println!("  [pick {} {}] {}", choice.token, choice.candidate_id, choice.label);
        }
        Ok(())
    }
}

/// Reads stdin lines, parses them into events and feeds the router until
/// EOF. Dropping the sender at EOF is what ends the dispatch loop.
pub async fn read_events(events: mpsc::Sender<Event>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let Some(event) = parse_line(&line) else {
            debug!("ignoring console line: {line}");
            continue;
        };
        if events.send(event).await.is_err() {
            break;
        }
    }
}

/// Console event grammar, one event per line:
/// - `/help`, `/set_folder`, `/current_folder` — commands
/// - `pick <token> <candidate_id>` — a button press
/// - `file <kind> <transfer_ref> <size_bytes> [name]` — a file arrival
/// - anything else — a free-text reply (including the cancel keyword)
fn parse_line(line: &str) -> Option<Event> {
    let chat = ChatId::from(CONSOLE_CHAT);
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(command) = Command::parse(line) {
        return Some(Event::Command { chat, command });
    }

    let mut words = line.split_whitespace();
    match words.next() {
        Some("pick") => {
            let token: u64 = words.next()?.parse().ok()?;
            let candidate_id = words.next()?.to_owned();
            Some(Event::Selection {
                chat,
                token: Token::from(token),
                candidate_id,
            })
        }
        Some("file") => {
            let media_kind = parse_kind(words.next()?)?;
            let transfer_ref: i64 = words.next()?.parse().ok()?;
            let size_bytes: u64 = words.next()?.parse().ok()?;
            let raw_name = words.next().map(ToOwned::to_owned);
            Some(Event::FileArrival {
                chat,
                file: FileArrival::new(transfer_ref, raw_name, media_kind, size_bytes),
            })
        }
        _ => Some(Event::Reply {
            chat,
            text: line.to_owned(),
        }),
    }
}

fn parse_kind(word: &str) -> Option<MediaKind> {
    match word {
        "document" => Some(MediaKind::Document),
        "video" => Some(MediaKind::Video),
        "audio" => Some(MediaKind::Audio),
        "photo" => Some(MediaKind::Photo),
        "sticker" => Some(MediaKind::Sticker),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn test_commands_are_parsed() {
        assert_matches!(
            parse_line("/set_folder"),
            Some(Event::Command {
                command: Command::SetFolder,
                ..
            })
        );
    }

    #[rstest]
    fn test_pick_line_carries_token_and_candidate() {
        let Some(Event::Selection {
            token,
            candidate_id,
            ..
        }) = parse_line("pick 3 a")
        else {
            panic!("pick line should parse to a selection");
        };
        assert_eq!(Token::from(3), token);
        assert_eq!("a", candidate_id);
    }

    #[rstest]
    fn test_file_line_with_and_without_name() {
        let Some(Event::FileArrival { file, .. }) = parse_line("file photo 42 2048") else {
            panic!("file line should parse to an arrival");
        };
        assert_eq!(None, *file.raw_name());
        assert_eq!(MediaKind::Photo, *file.media_kind());
        assert_eq!(42, file.transfer_ref());

        let Some(Event::FileArrival { file, .. }) = parse_line("file document 7 10 notes.txt")
        else {
            panic!("file line should parse to an arrival");
        };
        assert_eq!(Some("notes.txt".to_owned()), *file.raw_name());
    }

    #[rstest]
    #[case("pick x a")]
    #[case("file photo notanumber 1")]
    #[case("file floppy 1 1")]
    #[case("")]
    fn test_malformed_lines_are_ignored(#[case] line: &str) {
        assert_none!(parse_line(line));
    }

    #[rstest]
    fn test_other_text_is_a_reply() {
        assert_matches!(parse_line("  Docs  "), Some(Event::Reply { text, .. }) if text == "Docs");
        assert_matches!(parse_line("/cancel"), Some(Event::Reply { text, .. }) if text == "/cancel");
    }
}
