use thiserror::Error;

use super::{ChatId, Token};

/// Transport-level fault. Terminates the affected interaction, never the
/// dispatch loop.
#[derive(Debug, Error)]
#[error("transport failure: {0}")]
pub struct TransportError(pub String);

/// One selectable item of a candidate presentation. The payload the
/// transport hands back on a press must round-trip `token` and
/// `candidate_id` unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub token: Token,
    pub candidate_id: String,
}

/// Outbound side of the messaging transport. Delivery is fire-and-forget
/// from the core's perspective.
pub trait Transport {
    async fn send_text(&self, chat: ChatId, text: &str) -> Result<(), TransportError>;

    async fn send_choices(
        &self,
        chat: ChatId,
        text: &str,
        choices: &[Choice],
    ) -> Result<(), TransportError>;
}

impl<T: Transport> Transport for &T {
    async fn send_text(&self, chat: ChatId, text: &str) -> Result<(), TransportError> {
        (**self).send_text(chat, text).await
    }

    async fn send_choices(
        &self,
        chat: ChatId,
        text: &str,
        choices: &[Choice],
    ) -> Result<(), TransportError> {
        (**self).send_choices(chat, text, choices).await
    }
}
