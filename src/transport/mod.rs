//! Chat transport seam.
//!
//! The bot core never talks to Matrix directly. Incoming traffic is reduced to
//! [`ChatEvent`]s that the sync loop hands to the [`EventHub`], and outgoing
//! traffic goes through the [`Messenger`] trait, which the Matrix client
//! implements and tests mock.
//!
//! # Event flow
//!
//! ```text
//! Matrix sync ──► ChatEvent ──► Bot ──► EventHub::dispatch ──► Listener (one per pending chain step)
//!                                │
//!                                └──► Commander (new commands)
//! ```

mod hub;

use async_trait::async_trait;
use mockall::automock;

pub use crate::transport::hub::EventHub;

/// An incoming chat event relevant to the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A plain text message
    Message {
        room_id: String,
        sender_id: String,
        event_id: String,
        body: String,
    },
    /// An emoji reaction annotating another event
    Reaction {
        room_id: String,
        sender_id: String,
        /// Event the reaction annotates
        relates_to: String,
        key: String,
    },
}

impl ChatEvent {
    pub fn room_id(&self) -> &str {
        match self {
            ChatEvent::Message { room_id, .. } | ChatEvent::Reaction { room_id, .. } => room_id,
        }
    }

    pub fn sender_id(&self) -> &str {
        match self {
            ChatEvent::Message { sender_id, .. } | ChatEvent::Reaction { sender_id, .. } => {
                sender_id
            }
        }
    }
}

/// Outgoing side of the chat transport.
///
/// Sending methods return the id of the created event so that reactions can be
/// attached to it.
#[automock]
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends a Markdown message to a room.
    async fn send_text(&self, room_id: &str, body: &str) -> anyhow::Result<String>;

    /// Sends a Markdown reply to the event `event_id` sent by `sender_id`.
    async fn send_reply(
        &self,
        room_id: &str,
        sender_id: &str,
        event_id: &str,
        body: &str,
    ) -> anyhow::Result<String>;

    /// Reacts to `event_id` with the emoji `key`.
    async fn send_reaction(&self, room_id: &str, event_id: &str, key: &str) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_accessors() {
        let reaction = ChatEvent::Reaction {
            room_id: "!room:example.com".to_string(),
            sender_id: "@user:example.com".to_string(),
            relates_to: "$prompt".to_string(),
            key: "🟢".to_string(),
        };
        assert_eq!(reaction.room_id(), "!room:example.com");
        assert_eq!(reaction.sender_id(), "@user:example.com");
    }

    #[tokio::test]
    async fn test_mock_messenger_returns_event_id() {
        let mut messenger = MockMessenger::new();
        messenger
            .expect_send_text()
            .withf(|room_id, body| room_id.to_string() == "!room:example.com" && body.contains("hero"))
            .times(1)
            .returning(|_, _| Ok("$event".to_string()));

        let event_id = messenger
            .send_text("!room:example.com", "pick a hero")
            .await
            .unwrap();
        assert_eq!(event_id, "$event");
    }
}
