//! Listener registry shared by every pending chain step.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicU64, Ordering},
    },
};

use log::{debug, trace};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::transport::ChatEvent;

struct Registration {
    room_id: String,
    sender: UnboundedSender<ChatEvent>,
}

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    listeners: Mutex<HashMap<u64, Registration>>,
}

impl Registry {
    fn listeners(&self) -> MutexGuard<'_, HashMap<u64, Registration>> {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Fan-out of incoming chat events to room-scoped listeners.
///
/// Cloning the hub is cheap: clones share the same registry.
#[derive(Clone, Default)]
pub struct EventHub {
    registry: Arc<Registry>,
}

impl EventHub {
    pub fn new() -> Self {
        EventHub::default()
    }

    /// Registers a listener receiving every event of `room_id`.
    ///
    /// The listener is deregistered when dropped.
    pub fn listen(&self, room_id: &str) -> Listener {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = unbounded_channel();
        self.registry.listeners().insert(
            id,
            Registration {
                room_id: room_id.to_string(),
                sender,
            },
        );
        trace!("listener {id} registered on {room_id}");

        Listener {
            id,
            receiver,
            registry: self.registry.clone(),
        }
    }

    /// Delivers `event` to every listener of its room, returning how many got it.
    pub fn dispatch(&self, event: &ChatEvent) -> usize {
        let listeners = self.registry.listeners();
        let delivered = listeners
            .values()
            .filter(|registration| registration.room_id == event.room_id())
            .filter(|registration| registration.sender.send(event.clone()).is_ok())
            .count();
        if delivered > 0 {
            debug!("event in {} delivered to {delivered} listener(s)", event.room_id());
        }
        delivered
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.registry.listeners().len()
    }
}

/// Receiving end of a hub registration.
pub struct Listener {
    id: u64,
    receiver: UnboundedReceiver<ChatEvent>,
    registry: Arc<Registry>,
}

impl Listener {
    /// Waits for the next event. Never returns `None` while the listener lives.
    pub async fn recv(&mut self) -> Option<ChatEvent> {
        self.receiver.recv().await
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.registry.listeners().remove(&self.id);
        trace!("listener {} released", self.id);
    }
}
