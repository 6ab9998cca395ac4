//! Bot wiring.
//!
//! ```text
//!                     ┌────────────┐  command   ┌───────────┐  Reply   ┌───────────┐
//! MatrixClient ─────► │ Dispatcher │ ─────────► │ Commander │ ───────► │ Messenger │
//!   (ChatEvent)       └────────────┘            └───────────┘          └───────────┘
//!                        │      ▲                     │ Interactive          ▲
//!             other      │      │ cancel previous     ▼                      │ prompts
//!             messages,  │      └──────────── ┌───────────────┐ ─────────────┘
//!             reactions  ▼                    │ ReactionChain │
//!                     ┌──────────┐  listen    └───────────────┘
//!                     │ EventHub │ ◄──────────────────┘
//!                     └──────────┘
//! ```
//!
//! Every message that is not a command for the bot, and every reaction, is
//! forwarded to the [`EventHub`] in delivery order. A user has at most one
//! pending chain per room: a new interactive command cancels the previous one.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use log::{debug, error, info};
use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{
    Args,
    aliases::GameAliases,
    combos::ComboLoader,
    commands::{
        CommandParseError, CommandResult, Commander, InteractiveCommand, format_chain_aborted,
    },
    config::Config,
    matrix::{MatrixClient, UserCredentials},
    reactor::{AbortReason, ChainContext, ChainOutcome, ChainState, ReactionChain},
    transport::{ChatEvent, EventHub, Messenger},
    utils::get_path,
};

struct ActiveChain {
    generation: u64,
    cancel: CancellationToken,
    state: watch::Receiver<ChainState>,
}

/// Routes chat events to commands and pending chains.
pub struct Dispatcher<M: Messenger> {
    messenger: Arc<M>,
    commander: Arc<Commander>,
    hub: EventHub,
    reaction_timeout: Duration,
    /// Pending chain of each (room, user), tagged with a generation number
    active_chains: Mutex<HashMap<(String, String), ActiveChain>>,
    next_generation: AtomicU64,
    shutdown: CancellationToken,
}

impl<M: Messenger + 'static> Dispatcher<M> {
    pub fn new(messenger: Arc<M>, commander: Commander, reaction_timeout: Duration) -> Self {
        Dispatcher {
            messenger,
            commander: Arc::new(commander),
            hub: EventHub::new(),
            reaction_timeout,
            active_chains: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(0),
            shutdown: CancellationToken::new(),
        }
    }

    /// Handles one incoming event.
    ///
    /// Returns the handle of the spawned task answering a command, if any.
    pub fn handle_event(self: &Arc<Self>, event: ChatEvent) -> Option<JoinHandle<()>> {
        let ChatEvent::Message {
            room_id,
            sender_id,
            event_id,
            body,
        } = &event
        else {
            self.hub.dispatch(&event);
            return None;
        };

        let command = match self.commander.parse(body) {
            Ok(command) => command,
            Err(CommandParseError::NotForBot) => {
                self.hub.dispatch(&event);
                return None;
            }
            Err(CommandParseError::InvalidCommand(message)) => {
                let messenger = Arc::clone(&self.messenger);
                let (room_id, sender_id, event_id) =
                    (room_id.clone(), sender_id.clone(), event_id.clone());
                return Some(tokio::spawn(async move {
                    if let Err(e) = messenger
                        .send_reply(&room_id, &sender_id, &event_id, &message)
                        .await
                    {
                        error!("failed to send message: {:?}", e);
                    }
                }));
            }
        };

        let context = ChainContext {
            room_id: room_id.clone(),
            sender_id: sender_id.clone(),
            event_id: event_id.clone(),
        };
        let dispatcher = Arc::clone(self);

        Some(tokio::spawn(async move {
            match dispatcher.commander.parse_command(&command).await {
                CommandResult::Reply(response) => dispatcher.reply(&context, &response).await,
                CommandResult::Interactive(interactive) => {
                    dispatcher.run_interactive(context, interactive).await
                }
            }
        }))
    }

    /// Aborts every pending chain.
    pub fn shutdown(&self) {
        info!(
            "aborting pending chains ({} listener(s) registered)",
            self.hub.listener_count()
        );
        self.shutdown.cancel();
    }

    async fn run_interactive(&self, context: ChainContext, interactive: InteractiveCommand) {
        if interactive.pending_fields().is_empty() {
            let response = (interactive.render)(&interactive.fields);
            self.reply(&context, &response).await;
            return;
        }

        let InteractiveCommand {
            fields,
            steps,
            render,
        } = interactive;

        let chain = match ReactionChain::new(
            context.clone(),
            fields,
            steps,
            Arc::clone(&self.messenger),
            self.hub.clone(),
            self.reaction_timeout,
        ) {
            Ok(chain) => chain,
            Err(e) => {
                error!("invalid reaction chain: {e}");
                return;
            }
        };

        let (generation, cancel) = self.register_chain(&context, chain.subscribe());
        debug!(
            "starting chain for {:?} in {}",
            chain.pending_steps(),
            context.room_id
        );

        let mut response = None;
        let outcome = chain
            .run(cancel, |_, fields| response = Some(render(fields)))
            .await;

        self.release_chain(&context, generation);

        match (outcome, response) {
            (ChainOutcome::Complete { origins, .. }, Some(response)) => {
                debug!("chain complete, field origins: {origins:?}");
                self.reply(&context, &response).await
            }
            (ChainOutcome::Complete { .. }, None) => error!("chain completed without a response"),
            (ChainOutcome::Aborted(AbortReason::Transport(e)), _) => {
                error!("chain aborted on transport failure: {e}")
            }
            (ChainOutcome::Aborted(reason), _) => {
                self.reply(&context, &format_chain_aborted(&reason)).await
            }
        }
    }

    /// Records the chain of `context`, cancelling the previous one of the same
    /// user in the same room.
    fn register_chain(
        &self,
        context: &ChainContext,
        state: watch::Receiver<ChainState>,
    ) -> (u64, CancellationToken) {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let cancel = self.shutdown.child_token();
        let key = (context.room_id.clone(), context.sender_id.clone());

        let previous = self
            .active_chains
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(
                key,
                ActiveChain {
                    generation,
                    cancel: cancel.clone(),
                    state,
                },
            );
        if let Some(previous) = previous {
            info!(
                "cancelling previous chain of {} in {} ({:?})",
                context.sender_id,
                context.room_id,
                *previous.state.borrow()
            );
            previous.cancel.cancel();
        }

        (generation, cancel)
    }

    fn release_chain(&self, context: &ChainContext, generation: u64) {
        let mut chains = self
            .active_chains
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let key = (context.room_id.clone(), context.sender_id.clone());
        if chains
            .get(&key)
            .is_some_and(|current| current.generation == generation)
        {
            chains.remove(&key);
        }
    }

    async fn reply(&self, context: &ChainContext, body: &str) {
        if let Err(e) = self
            .messenger
            .send_reply(&context.room_id, &context.sender_id, &context.event_id, body)
            .await
        {
            error!("failed to send message: {:?}", e);
        }
    }
}

pub struct Bot {
    matrix_client: Arc<MatrixClient>,
    dispatcher: Arc<Dispatcher<MatrixClient>>,
}

impl Bot {
    pub async fn new(config: Config, args: Args) -> anyhow::Result<Self> {
        let matrix_client = Arc::new(
            MatrixClient::new(
                &UserCredentials {
                    user_id: config.matrix.user_id,
                    password: config.matrix.password,
                    passphrase: config.matrix.passphrase,
                },
                &get_path(&args.data, "session"),
            )
            .await?,
        );

        let combos_file = config
            .bot
            .combos_file
            .clone()
            .unwrap_or_else(|| get_path(&args.data, "combos.json"));
        let commander = Commander::new(
            &config.bot.prefix,
            Arc::new(GameAliases::new()),
            ComboLoader::new(combos_file),
        )?
        .with_invalid_input_policy(config.bot.invalid_input);

        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&matrix_client),
            commander,
            config.bot.reaction_timeout(),
        ));

        Ok(Bot {
            matrix_client,
            dispatcher,
        })
    }

    /// Syncs with the homeserver until the sync loop ends or ctrl-c is received.
    pub async fn start(self) {
        let dispatcher = Arc::clone(&self.dispatcher);
        let on_event = move |event: ChatEvent| {
            dispatcher.handle_event(event);
        };

        tokio::select! {
            _ = self.matrix_client.sync(on_event) => {}
            _ = tokio::signal::ctrl_c() => info!("received ctrl-c, shutting down"),
        }

        self.dispatcher.shutdown();
    }
}
