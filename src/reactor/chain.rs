//! Sequential state machine collecting unresolved fields.
//!
//! A [`ReactionChain`] walks its steps in declaration order. Steps whose field
//! was already resolved by static parsing are skipped. For every other step
//! the chain:
//!
//! 1. registers a room-scoped `Listener` on the [`EventHub`],
//! 2. sends the reactor's prompt and seeds its reactions,
//! 3. publishes [`ChainState::Pending`],
//! 4. races cancellation, the step deadline and the next event.
//!
//! ```text
//!            presupplied
//!          ┌────────────┐
//!          │            ▼
//! Pending(i) ──────► Pending(i + 1) ──► ... ──► Complete
//!     │  resolved
//!     ├── timeout ──────────────┐
//!     ├── cancel ───────────────┤
//!     └── invalid (Abort) ──────┴─► Aborted
//! ```
//!
//! Only events from the originating user in the originating room qualify, and
//! a reaction qualifies only when it annotates the step's prompt. The
//! listener is dropped on every exit path of a step, so no two steps of a
//! chain ever listen at the same time.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use futures::future::join_all;
use log::{debug, info, warn};
use thiserror::Error;
use tokio::{
    sync::watch,
    time::{Instant, sleep_until},
};
use tokio_util::sync::CancellationToken;

use crate::{
    parser::{FieldKey, Fields, SchemaError, Value},
    reactor::{Acceptance, InvalidInputPolicy, Reactor, StepInput},
    transport::{ChatEvent, EventHub, Messenger},
};

/// Text a user can reply with to abandon a pending chain.
const CANCEL_WORD: &str = "cancel";

/// The conversation a chain belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainContext {
    pub room_id: String,
    /// User who issued the command; the only one allowed to answer
    pub sender_id: String,
    /// Event of the command message, prompts reply to it
    pub event_id: String,
}

/// Why a chain stopped before completing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbortReason {
    #[error("no answer for {0} in time")]
    Timeout(FieldKey),
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: FieldKey, reason: String },
    #[error("cancelled")]
    Cancelled,
    #[error("could not reach the chat server: {0}")]
    Transport(String),
}

/// Observable state of a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainState {
    /// Created, not running yet
    Idle,
    /// Waiting on the step with this index
    Pending(usize),
    Complete,
    Aborted(AbortReason),
}

/// Where the final value of a field came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOrigin {
    Parsed,
    Reacted,
    /// Declared by the command but neither parsed nor asked for
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChainOutcome {
    Complete {
        fields: Fields,
        origins: BTreeMap<FieldKey, FieldOrigin>,
    },
    Aborted(AbortReason),
}

pub struct ReactionChain<M: Messenger> {
    context: ChainContext,
    fields: Fields,
    steps: Vec<Box<dyn Reactor>>,
    messenger: Arc<M>,
    hub: EventHub,
    timeout: Duration,
    state: watch::Sender<ChainState>,
}

impl<M: Messenger> ReactionChain<M> {
    /// Creates a chain completing `fields`, the outcome of static parsing.
    ///
    /// # Arguments
    ///
    /// * `context` - Conversation the command came from
    /// * `fields` - Parsed fields; every step key must be declared in it
    /// * `steps` - One reactor per field the user may be asked for
    /// * `messenger` - Outgoing transport for prompts
    /// * `hub` - Incoming events
    /// * `timeout` - Time the user has to answer each step
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when two steps resolve the same field or when a
    /// step field is not declared in `fields`.
    pub fn new(
        context: ChainContext,
        fields: Fields,
        steps: Vec<Box<dyn Reactor>>,
        messenger: Arc<M>,
        hub: EventHub,
        timeout: Duration,
    ) -> Result<Self, SchemaError> {
        let mut keys = Vec::with_capacity(steps.len());
        for step in &steps {
            let key = step.field_key();
            if keys.contains(&key) {
                return Err(SchemaError::DuplicateKey(key));
            }
            if !fields.contains_key(key) {
                return Err(SchemaError::UndeclaredKey(key));
            }
            keys.push(key);
        }

        let (state, _) = watch::channel(ChainState::Idle);

        Ok(ReactionChain {
            context,
            fields,
            steps,
            messenger,
            hub,
            timeout,
            state,
        })
    }

    /// Keys of the steps the user will be asked for, in order.
    pub fn pending_steps(&self) -> Vec<FieldKey> {
        self.steps
            .iter()
            .map(|step| step.field_key())
            .filter(|key| !self.fields.is_resolved(*key))
            .collect()
    }

    /// Receiver following the chain state.
    pub fn subscribe(&self) -> watch::Receiver<ChainState> {
        self.state.subscribe()
    }

    /// Drives the chain to completion or abort.
    ///
    /// `on_complete` is invoked exactly once, with the merged fields, when and
    /// only when every step resolved. Cancelling `cancel` aborts the chain from
    /// any pending step.
    pub async fn run<F>(self, cancel: CancellationToken, on_complete: F) -> ChainOutcome
    where
        F: FnOnce(&ChainContext, &Fields),
    {
        let mut fields = self.fields.clone();
        let mut origins: BTreeMap<FieldKey, FieldOrigin> = fields
            .keys()
            .map(|key| {
                let origin = if fields.is_resolved(key) {
                    FieldOrigin::Parsed
                } else {
                    FieldOrigin::Default
                };
                (key, origin)
            })
            .collect();

        for (index, step) in self.steps.iter().enumerate() {
            let key = step.field_key();
            if fields.is_resolved(key) {
                debug!("step {index} ({key}) presupplied, skipping");
                continue;
            }

            match self.run_step(index, step.as_ref(), &cancel).await {
                Ok(value) => {
                    debug!("step {index} ({key}) resolved to {value}");
                    fields.set(key, value);
                    origins.insert(key, FieldOrigin::Reacted);
                }
                Err(reason) => {
                    info!(
                        "chain of {} in {} aborted: {reason}",
                        self.context.sender_id, self.context.room_id
                    );
                    self.state.send_replace(ChainState::Aborted(reason.clone()));
                    return ChainOutcome::Aborted(reason);
                }
            }
        }

        self.state.send_replace(ChainState::Complete);
        on_complete(&self.context, &fields);
        ChainOutcome::Complete { fields, origins }
    }

    async fn run_step(
        &self,
        index: usize,
        step: &dyn Reactor,
        cancel: &CancellationToken,
    ) -> Result<Value, AbortReason> {
        if cancel.is_cancelled() {
            return Err(AbortReason::Cancelled);
        }

        let context = &self.context;
        // Registered before the prompt exists so that no answer can be missed
        let mut listener = self.hub.listen(&context.room_id);

        let prompt = step.prompt();
        let prompt_id = self
            .messenger
            .send_reply(&context.room_id, &context.sender_id, &context.event_id, &prompt.body)
            .await
            .map_err(|e| AbortReason::Transport(e.to_string()))?;

        let seeded = join_all(prompt.reactions.iter().map(|key| {
            self.messenger
                .send_reaction(&context.room_id, &prompt_id, key)
        }))
        .await;
        for error in seeded.into_iter().filter_map(Result::err) {
            warn!("failed to seed reaction on {prompt_id}: {error:?}");
        }

        self.state.send_replace(ChainState::Pending(index));
        let deadline = Instant::now() + self.timeout;

        loop {
            let event = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(AbortReason::Cancelled),
                _ = sleep_until(deadline) => return Err(AbortReason::Timeout(step.field_key())),
                event = listener.recv() => event,
            };
            let Some(event) = event else {
                return Err(AbortReason::Transport("event stream closed".to_string()));
            };

            let (input, reply_to) = match &event {
                _ if event.sender_id() != context.sender_id => continue,
                ChatEvent::Message { body, .. } if body.trim().eq_ignore_ascii_case(CANCEL_WORD) => {
                    return Err(AbortReason::Cancelled);
                }
                ChatEvent::Message { body, event_id, .. } => (StepInput::Text(body), event_id),
                ChatEvent::Reaction {
                    relates_to, key, ..
                } if *relates_to == prompt_id => (StepInput::Reaction(key), &prompt_id),
                ChatEvent::Reaction { .. } => continue,
            };

            match step.accept(input) {
                Acceptance::Resolved(value) => return Ok(value),
                Acceptance::Ignored => continue,
                Acceptance::Rejected(reason) => match step.policy() {
                    InvalidInputPolicy::Abort => {
                        return Err(AbortReason::InvalidInput {
                            field: step.field_key(),
                            reason,
                        });
                    }
                    InvalidInputPolicy::RePrompt => {
                        debug!("step {index} rejected input: {reason}");
                        let body = format!("{reason}. Try again, or reply `{CANCEL_WORD}`.");
                        if let Err(e) = self
                            .messenger
                            .send_reply(&context.room_id, &context.sender_id, reply_to, &body)
                            .await
                        {
                            warn!("failed to re-prompt: {e:?}");
                        }
                    }
                },
            }
        }
    }
}
