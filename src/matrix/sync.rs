//! Matrix sync loop turning room events into [`ChatEvent`]s.
//!
//! ```text
//! homeserver ──sync──► OriginalSyncRoomMessageEvent ──► ChatEvent::Message  ──┐
//!                      OriginalSyncReactionEvent    ──► ChatEvent::Reaction ──┴─► on_event
//!                      StrippedRoomMemberEvent      ──► auto join
//! ```
//!
//! Events sent by the bot itself are never forwarded, so the reactions it
//! seeds on its prompts do not count as answers.

use std::sync::Arc;

use anyhow::Result;
use log::{error, info, warn};
use matrix_sdk::{
    Client, LoopCtrl, Room, RoomState,
    config::SyncSettings,
    ruma::{
        UserId,
        api::client::filter::FilterDefinition,
        events::{
            reaction::OriginalSyncReactionEvent,
            room::{
                member::StrippedRoomMemberEvent,
                message::{MessageType, OriginalSyncRoomMessageEvent},
            },
        },
    },
};
use tokio::time::{Duration, sleep};

use crate::{matrix::session::SessionStore, transport::ChatEvent};

pub struct MatrixSync {
    client: Client,
    session_store: SessionStore,
}

impl MatrixSync {
    pub fn new(client: &Client, session_store: &SessionStore) -> Self {
        MatrixSync {
            client: client.to_owned(),
            session_store: session_store.to_owned(),
        }
    }

    /// Syncs forever, calling `on_event` for every new message and reaction.
    pub async fn sync<F>(&self, on_event: F) -> Result<()>
    where
        F: Fn(ChatEvent) + Send + Sync + 'static,
    {
        info!("start syncing");

        self.client.add_event_handler(auto_join_rooms);

        // See <https://spec.matrix.org/v1.6/client-server-api/#lazy-loading-room-members>.
        let filter = FilterDefinition::with_lazy_loading();
        let mut sync_settings = SyncSettings::default().filter(filter.into());

        if let Some(sync_token) = self.session_store.sync_token() {
            sync_settings = sync_settings.token(sync_token);
        }

        // Catch up without handlers so that events received while offline are skipped
        let mut delay = 2;
        let response = loop {
            match self.client.sync_once(sync_settings.clone()).await {
                Ok(response) => break response,
                Err(e) => {
                    error!("initial sync failed ({e}), retrying in {delay}s");
                    sleep(Duration::from_secs(delay)).await;
                    delay = (delay * 2).min(300);
                }
            }
        };
        if let Err(e) = self
            .session_store
            .persist_sync_token(response.next_batch.clone())
            .await
        {
            error!("failed to persist sync token: {:?}", e);
        }

        let on_event = Arc::new(on_event);

        self.client.add_event_handler({
            let on_event = Arc::clone(&on_event);
            move |event: OriginalSyncRoomMessageEvent, room: Room, client: Client| async move {
                on_room_message(event, room, client, &on_event)
            }
        });
        self.client.add_event_handler({
            let on_event = Arc::clone(&on_event);
            move |event: OriginalSyncReactionEvent, room: Room, client: Client| async move {
                on_reaction(event, room, client, &on_event)
            }
        });

        sync_settings = sync_settings.token(response.next_batch);

        self.client
            .sync_with_result_callback(sync_settings, |sync_result| async move {
                let response = sync_result?;

                if let Err(e) = self
                    .session_store
                    .persist_sync_token(response.next_batch)
                    .await
                {
                    error!("failed to persist sync token: {:?}", e);
                }

                Ok(LoopCtrl::Continue)
            })
            .await?;

        Ok(())
    }
}

async fn auto_join_rooms(room_member: StrippedRoomMemberEvent, client: Client, room: Room) {
    let Some(user_id) = client.user_id() else {
        warn!("could not get user id from client");
        return;
    };

    if room_member.state_key != user_id {
        return;
    }

    tokio::spawn(async move {
        info!("auto joining room {}", room.room_id());
        let mut delay = 2;

        // Synapse may send the invite before the room can be joined,
        // see https://github.com/matrix-org/synapse/issues/4345
        while let Err(err) = room.join().await {
            error!(
                "failed to join room {} ({err:?}), retrying in {delay}s",
                room.room_id()
            );

            sleep(Duration::from_secs(delay)).await;
            delay *= 2;

            if delay > 3600 {
                error!("can't join room {} ({err:?})", room.room_id());
                return;
            }
        }
        info!("successfully joined room {}", room.room_id());
    });
}

/// Whether the event should reach the bot: joined room, not sent by the bot.
fn is_relevant(room: &Room, client: &Client, sender: &UserId) -> bool {
    room.state() == RoomState::Joined && client.user_id() != Some(sender)
}

fn on_room_message<F>(event: OriginalSyncRoomMessageEvent, room: Room, client: Client, on_event: &Arc<F>)
where
    F: Fn(ChatEvent) + Send + Sync + 'static,
{
    if !is_relevant(&room, &client, &event.sender) {
        return;
    }

    let MessageType::Text(text_content) = event.content.msgtype else {
        return;
    };

    on_event(ChatEvent::Message {
        room_id: room.room_id().to_string(),
        sender_id: event.sender.to_string(),
        event_id: event.event_id.to_string(),
        body: text_content.body,
    });
}

fn on_reaction<F>(event: OriginalSyncReactionEvent, room: Room, client: Client, on_event: &Arc<F>)
where
    F: Fn(ChatEvent) + Send + Sync + 'static,
{
    if !is_relevant(&room, &client, &event.sender) {
        return;
    }

    let annotation = event.content.relates_to;
    on_event(ChatEvent::Reaction {
        room_id: room.room_id().to_string(),
        sender_id: event.sender.to_string(),
        relates_to: annotation.event_id.to_string(),
        key: annotation.key,
    });
}
