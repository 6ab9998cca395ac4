//! Matrix client wrapper.
//!
//! [`MatrixClient`] owns the logged-in matrix-sdk [`Client`], runs the sync
//! loop and implements the outgoing [`Messenger`] transport.

use anyhow::{Context, bail};
use async_trait::async_trait;
use log::{debug, error, info};
use matrix_sdk::{
    Client, Room,
    ruma::{
        EventId, RoomId, UserId,
        api::client::message::send_message_event,
        events::{
            MessageLikeEventContent,
            reaction::ReactionEventContent,
            relation::Annotation,
            room::message::{AddMentions, ForwardThread, ReplyMetadata, RoomMessageEventContent},
        },
    },
};

use crate::{
    matrix::{UserCredentials, login::setup_client, session::SessionStore, sync::MatrixSync},
    transport::{ChatEvent, Messenger},
};

pub struct MatrixClient {
    matrix_sync: MatrixSync,
    client: Client,
}

impl MatrixClient {
    /// Logs in (or restores the session stored in `session_path`).
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be set up or logged in.
    pub async fn new(
        user_credentials: &UserCredentials,
        session_path: &str,
    ) -> anyhow::Result<Self> {
        let session_store = SessionStore::open(session_path).await?;

        let client = setup_client(user_credentials, &session_store)
            .await
            .context("failed to setup matrix client")?;

        client.account().set_display_name(Some("Quincy")).await?;

        let matrix_sync = MatrixSync::new(&client, &session_store);

        Ok(MatrixClient {
            matrix_sync,
            client,
        })
    }

    /// Runs the sync loop until it fails, forwarding every event to `on_event`.
    pub async fn sync<F>(&self, on_event: F)
    where
        F: Fn(ChatEvent) + Send + Sync + 'static,
    {
        match self.matrix_sync.sync(on_event).await {
            Ok(_) => info!("matrix sync ended successfully"),
            Err(e) => error!("matrix sync ended with error: {:?}", e),
        }
    }

    fn room(&self, room_id: &str) -> anyhow::Result<Room> {
        let room_id = RoomId::parse(room_id)?;
        match self.client.get_room(&room_id) {
            Some(room) => Ok(room),
            None => bail!("unknown room {room_id}"),
        }
    }

    async fn send(
        &self,
        room_id: &str,
        content: impl MessageLikeEventContent,
    ) -> anyhow::Result<String> {
        let room = self.room(room_id)?;
        let response = room.send(content).await?;
        let event_id = sent_event_id(&response);

        debug!("sent event {event_id} to {room_id}");
        Ok(event_id)
    }
}

#[async_trait]
impl Messenger for MatrixClient {
    async fn send_text(&self, room_id: &str, body: &str) -> anyhow::Result<String> {
        self.send(room_id, RoomMessageEventContent::text_markdown(body))
            .await
    }

    async fn send_reply(
        &self,
        room_id: &str,
        sender_id: &str,
        event_id: &str,
        body: &str,
    ) -> anyhow::Result<String> {
        let sender = UserId::parse(sender_id)?;
        let event = EventId::parse(event_id)?;

        let content = RoomMessageEventContent::text_markdown(body).make_reply_to(
            ReplyMetadata::new(&event, &sender, None),
            ForwardThread::No,
            AddMentions::No,
        );

        self.send(room_id, content).await
    }

    async fn send_reaction(&self, room_id: &str, event_id: &str, key: &str) -> anyhow::Result<()> {
        let event = EventId::parse(event_id)?;
        let content = ReactionEventContent::new(Annotation::new(event, key.to_string()));

        self.send(room_id, content).await?;
        Ok(())
    }
}

/// Id of the event created by a send request, used to relate reactions to it.
fn sent_event_id(response: &send_message_event::v3::Response) -> String {
    response.event_id.to_string()
}

#[cfg(test)]
mod tests {
    use matrix_sdk::ruma::owned_event_id;

    use super::*;

    #[test]
    fn test_sent_event_id() {
        let response = send_message_event::v3::Response::new(owned_event_id!("$prompt:example.com"));
        assert_eq!(sent_event_id(&response), "$prompt:example.com");
    }
}
