//! Interactive completion of command arguments.
//!
//! When static parsing leaves fields unresolved, a [`ReactionChain`] asks the
//! user for them one at a time. Each step is driven by a [`Reactor`], a pure
//! resolver that knows how to prompt for one field and how to interpret a
//! reply:
//!
//! | Reactor | Prompt | Resolves from |
//! |---------|--------|---------------|
//! | [`MenuReactor`] | lettered option list | reaction on the prompt, or a text reply naming the option |
//! | [`EmojiReactor`] | emoji choices | reaction on the prompt |
//! | [`SingleTextParser`] | free-text question | text reply accepted by a leaf parser |
//!
//! Reactors never touch the transport: the chain sends their prompts, listens
//! for events and feeds qualifying ones to [`Reactor::accept`].

mod chain;
mod emoji;
mod menu;
mod text;

pub use crate::reactor::{
    chain::{AbortReason, ChainContext, ChainOutcome, ChainState, ReactionChain},
    emoji::EmojiReactor,
    menu::MenuReactor,
    text::SingleTextParser,
};

use serde::Deserialize;

use crate::parser::{FieldKey, Value};

/// What a text step does with a reply its grammar rejects.
///
/// Configured with `bot.invalid_input` (`reprompt` or `abort`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidInputPolicy {
    /// Explain the problem and keep waiting
    #[default]
    RePrompt,
    /// Abort the whole chain
    Abort,
}

/// A message asking the user for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Markdown body
    pub body: String,
    /// Reactions seeded on the prompt so the user only has to click
    pub reactions: Vec<String>,
}

/// Qualifying input from the originating user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepInput<'a> {
    Text(&'a str),
    /// Reaction key on the step's prompt
    Reaction(&'a str),
}

/// How a reactor judged an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acceptance {
    Resolved(Value),
    /// The input was meant for this step but is invalid
    Rejected(String),
    /// The input is not for this step
    Ignored,
}

/// Resolver for one field of a reaction chain.
pub trait Reactor: Send + Sync {
    fn field_key(&self) -> FieldKey;

    fn policy(&self) -> InvalidInputPolicy {
        InvalidInputPolicy::RePrompt
    }

    fn prompt(&self) -> Prompt;

    fn accept(&self, input: StepInput<'_>) -> Acceptance;
}
