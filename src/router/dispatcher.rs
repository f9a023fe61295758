use std::{collections::HashMap, time::Duration};

use futures::StreamExt;
use log::{debug, trace, warn};
use tokio::sync::mpsc;
use tokio_util::time::{DelayQueue, delay_queue};

use crate::{config::Config, drive::DriveIndex};

use super::{
    ChatId, Command, CurrentFolder, Event, FileArrival, SessionCache, Token, Transport,
    TransportError, ingest,
    selection::{self, ReplyAction, SelectOutcome},
};

const HELP_TEXT: &str = "Drivebot routes files you send here into your drive.\n\n\
Commands:\n\
/set_folder - set the folder for file uploads\n\
/current_folder - show the current folder\n\n\
Send or forward a file and it will be registered under the current folder.";

/// Owns the shared state of the core (session cache, current folder, pending
/// prompts) and dispatches the single inbound event stream. Each state
/// transition is one mutation through a contract method; no event handler
/// blocks the dispatch of unrelated events.
pub struct Router<D, T> {
    index: D,
    transport: T,
    sessions: SessionCache,
    current_folder: CurrentFolder,
    /// Chats currently awaiting a free-text folder name, each with the key
    /// of its deadline in `deadlines`. Invariant: every key stored here is
    /// still queued.
    pending: HashMap<ChatId, delay_queue::Key>,
    /// Last choice list presented per chat, so a fresh `set_folder` can
    /// expire the superseded session instead of leaving it to eviction.
    presented: HashMap<ChatId, Token>,
    deadlines: DelayQueue<ChatId>,
    reply_timeout: Duration,
    cancel_keyword: String,
}

impl<D: DriveIndex, T: Transport> Router<D, T> {
    pub fn new(index: D, transport: T, config: &Config) -> Self {
        Self {
            index,
            transport,
            sessions: SessionCache::new(config.session_capacity()),
            current_folder: CurrentFolder::default(),
            pending: HashMap::new(),
            presented: HashMap::new(),
            deadlines: DelayQueue::new(),
            reply_timeout: config.reply_timeout(),
            cancel_keyword: config.cancel_keyword().clone(),
        }
    }

    /// Drives the dispatch loop until the event stream closes. Faults of a
    /// single interaction are logged and dropped; they never abort the loop.
    pub async fn run(&mut self, mut events: mpsc::Receiver<Event>) {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        if let Err(e) = self.dispatch(event).await {
                            warn!("interaction aborted: {e}");
                        }
                    }
                    None => break,
                },
                Some(expired) = self.deadlines.next() => {
                    if let Err(e) = self.reply_timed_out(expired.into_inner()).await {
                        warn!("interaction aborted: {e}");
                    }
                }
            }
        }
        debug!("event stream closed, dispatch loop done");
    }

    pub async fn dispatch(&mut self, event: Event) -> Result<(), TransportError> {
        match event {
            Event::Command { chat, command } => match command {
                Command::Help => self.transport.send_text(chat, HELP_TEXT).await,
                Command::SetFolder => self.begin_selection(chat).await,
                Command::CurrentFolder => self.report_current_folder(chat).await,
            },
            Event::Reply { chat, text } => self.handle_reply(chat, &text).await,
            Event::Selection {
                chat,
                token,
                candidate_id,
            } => self.handle_selection(chat, token, &candidate_id).await,
            Event::FileArrival { chat, file } => self.handle_file(chat, file).await,
        }
    }

    /// First protocol step: prompt for a folder name and arm the reply
    /// deadline. A prompt already pending for this chat is superseded.
    async fn begin_selection(&mut self, chat: ChatId) -> Result<(), TransportError> {
        if let Some(key) = self.pending.remove(&chat) {
            self.deadlines.remove(&key);
            debug!("superseding pending folder prompt for chat {chat}");
        }
        if let Some(token) = self.presented.remove(&chat) {
            self.sessions.expire(token);
            debug!("superseding presented choices for chat {chat}");
        }

        self.transport
            .send_text(
                chat,
                &format!(
                    "Send the folder name where you want to upload files\n\n{} to cancel",
                    self.cancel_keyword
                ),
            )
            .await?;

        let key = self.deadlines.insert(chat, self.reply_timeout);
        self.pending.insert(chat, key);
        Ok(())
    }

    /// Free-text replies are only consumed while their chat awaits a folder
    /// name; anything else is dropped.
    async fn handle_reply(&mut self, chat: ChatId, text: &str) -> Result<(), TransportError> {
        let Some(key) = self.pending.remove(&chat) else {
            trace!("dropping reply from chat {chat} with no pending prompt");
            return Ok(());
        };
        self.deadlines.remove(&key);

        let action =
            selection::handle_folder_name(&self.index, &mut self.sessions, &self.cancel_keyword, text)
                .await;
        match action {
            Ok(ReplyAction::Cancelled) => self.transport.send_text(chat, "Cancelled").await,
            Ok(ReplyAction::NoMatch) => {
                self.transport
                    .send_text(chat, &format!("No folder found with name: {}", text.trim()))
                    .await
            }
            Ok(ReplyAction::Present { token, choices }) => {
                self.presented.insert(chat, token);
                self.transport
                    .send_choices(
                        chat,
                        "Select the folder where you want to upload files:",
                        &choices,
                    )
                    .await
            }
            Err(e) => {
                warn!("folder search failed: {e}");
                self.transport
                    .send_text(chat, &format!("Folder search failed: {e}"))
                    .await
            }
        }
    }

    async fn handle_selection(
        &mut self,
        chat: ChatId,
        token: Token,
        candidate_id: &str,
    ) -> Result<(), TransportError> {
        let outcome = selection::commit_selection(
            &mut self.sessions,
            &mut self.current_folder,
            token,
            candidate_id,
        );
        // an invalid choice leaves the session live, so its entry stays too
        if !matches!(outcome, SelectOutcome::Invalid) && self.presented.get(&chat) == Some(&token) {
            self.presented.remove(&chat);
        }
        match outcome {
            SelectOutcome::Committed(candidate) => {
                self.transport
                    .send_text(
                        chat,
                        &format!(
                            "Folder set to {}\n\nFiles you send now will be uploaded there.",
                            candidate.name()
                        ),
                    )
                    .await
            }
            SelectOutcome::Expired => {
                self.transport
                    .send_text(chat, "Request expired, send /set_folder again")
                    .await
            }
            SelectOutcome::Invalid => self.transport.send_text(chat, "Invalid folder").await,
        }
    }

    async fn handle_file(&mut self, chat: ChatId, file: FileArrival) -> Result<(), TransportError> {
        let destination = self.current_folder.get();
        let folder_name = destination
            .as_ref()
            .map(|destination| destination.folder_name().clone());
        match ingest::ingest_file(&self.index, destination, &file).await {
            Ok(file) => {
                let folder_name =
                    folder_name.expect("destination should be set after a successful ingest");
                self.transport
                    .send_text(
                        chat,
                        &format!(
                            "File uploaded\n\nFile name: {}\nFolder: {folder_name}",
                            file.name()
                        ),
                    )
                    .await
            }
            Err(e) => {
                warn!("ingestion failed: {e}");
                self.transport
                    .send_text(chat, &format!("Upload failed: {e}"))
                    .await
            }
        }
    }

    async fn reply_timed_out(&mut self, chat: ChatId) -> Result<(), TransportError> {
        if self.pending.remove(&chat).is_none() {
            return Ok(());
        }
        debug!("folder prompt for chat {chat} timed out");
        self.transport
            .send_text(chat, "Timeout\n\nUse /set_folder to try again")
            .await
    }

    async fn report_current_folder(&self, chat: ChatId) -> Result<(), TransportError> {
        let text = match self.current_folder.display_name() {
            Some(name) => format!("Current folder: {name}"),
            None => "No folder set, use /set_folder to pick one".to_owned(),
        };
        self.transport.send_text(chat, &text).await
    }

    #[cfg(test)]
    pub fn current_folder(&self) -> &CurrentFolder {
        &self.current_folder
    }
}
