//! Bot command parsing and response formatting.
//!
//! This module provides the complete command processing pipeline for the
//! Quincy bot, letting Matrix users look up game references from chat.
//!
//! # Overview
//!
//! The commands module handles the entire lifecycle of bot commands:
//! 1. **Recognition** - Converting Matrix messages into [`command::Command`] enums
//! 2. **Argument parsing** - Running each command's parser tree over its arguments
//! 3. **Execution** - Routing commands to specialized handlers
//! 4. **Response** - Formatting results as Markdown for Matrix display
//!
//! A handler either answers right away ([`CommandResult::Reply`]) or, when
//! some of its fields are missing, hands an [`InteractiveCommand`] back to the
//! bot, which collects the rest through a
//! [`ReactionChain`](crate::reactor::ReactionChain).
//!
//! # Architecture
//!
//! ```text
//! Matrix Message
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Commander  │  ← Entry point: parse() + parse_command()
//! └─────────────┘
//!      │
//!      ├── parse() ────────────────────┐
//!      │                               ▼
//!      │                   ┌──────────────────┐
//!      │                   │  command::Command│
//!      │                   └──────────────────┘
//!      │
//!      └── parse_command() ───────────┐
//!                                     ▼
//!                      ┌──────────────────────────────┐
//!                      │ Action Handlers              │
//!                      │  - handle_help               │
//!                      │  - handle_hero_level_energizer│
//!                      │  - handle_two_tc             │
//!                      └──────────────────────────────┘
//!                                     │
//!                                     ▼
//!                      ┌──────────────────────────────┐
//!                      │  CommandResult               │
//!                      │  - Reply (MD)                │
//!                      │  - Interactive (chain steps) │
//!                      └──────────────────────────────┘
//! ```
//!
//! # Command Structure
//!
//! All commands follow the format: `!q <subcommand> [args...]`, where `q` is
//! the configurable bot prefix.
//!
//! | Command | Arguments | Description |
//! |---------|-----------|-------------|
//! | `help` | None | Display help information |
//! | `herolevelenergizer` (`hle`, ...) | `[hero] [round] [map_difficulty] [round]` | Hero leveling with the Energizer |
//! | `2tc` | `[map] [tower [tower] \| number] [u#person] [version]` | Two-tower CHIMPS combos |
//!
//! # Error Handling
//!
//! - **Silent Errors** ([`CommandParseError::NotForBot`]): Messages that aren't
//!   commands or are for a different bot.
//! - **User Errors** ([`CommandParseError::InvalidCommand`]): Unknown
//!   subcommands, answered with a pointer to the help.
//!
//! Argument errors are not parse errors at this level: the handler answers
//! them with a "Likely cause(s)" reply.

use crate::{
    parser::{FieldKey, Fields},
    reactor::Reactor,
};

mod actions;
mod command;
mod commander;
mod markdown_response;

pub use crate::commands::{commander::Commander, markdown_response::format_chain_aborted};

/// Renders the final reply of an interactive command from its complete fields.
pub type Render = Box<dyn FnOnce(&Fields) -> String + Send>;

/// A command waiting for the user to supply missing fields.
pub struct InteractiveCommand {
    /// Fields resolved by static parsing, every schema key declared
    pub fields: Fields,
    /// One reactor per field that may be asked for, in asking order
    pub steps: Vec<Box<dyn Reactor>>,
    pub render: Render,
}

impl InteractiveCommand {
    /// Keys of the steps whose field is still unresolved.
    pub fn pending_fields(&self) -> Vec<FieldKey> {
        self.steps
            .iter()
            .map(|step| step.field_key())
            .filter(|key| !self.fields.is_resolved(*key))
            .collect()
    }
}

/// Result of command execution.
pub enum CommandResult {
    /// Markdown-formatted response message
    Reply(String),
    Interactive(InteractiveCommand),
}

/// Errors that can occur during command parsing.
///
/// # Variants
///
/// * `NotForBot` - Message is not a command or is for a different bot.
///   Should be handled silently without responding to the user.
///
/// * `InvalidCommand` - Command is not recognized.
///   Contains a user-friendly error message to display.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandParseError {
    /// Message is not for this bot (silent error)
    NotForBot,
    /// Invalid command with error message
    InvalidCommand(String),
}
