//! Command orchestration and execution.
//!
//! This module provides the [`Commander`] struct, which serves as the main entry point
//! for processing bot commands. It coordinates command parsing and execution, routing
//! commands to their appropriate handlers.
//!
//! # Architecture
//!
//! The Commander follows a two-phase processing model:
//!
//! 1. **Parsing Phase** - Validates and parses raw message text into structured [`Command`] enums
//! 2. **Execution Phase** - Routes parsed commands to specialized handlers that produce results
//!
//! # Flow
//!
//! ```text
//! Matrix Message → parse() → Command → parse_command() → CommandResult
//! ```
//!
//! # Examples
//!
//! ```ignore
//! let commander = Commander::new("q", aliases, combo_loader)?;
//!
//! let command = commander.parse("!q hle gwen r40")?;
//! match commander.parse_command(&command).await {
//!     CommandResult::Reply(response) => println!("{response}"),
//!     CommandResult::Interactive(interactive) => println!("{:?}", interactive.pending_fields()),
//! }
//! ```

use std::sync::Arc;

use command_parser::Parser;

use crate::{
    aliases::AliasProvider,
    combos::ComboLoader,
    commands::{
        CommandParseError, CommandResult,
        actions::{
            handle_help, handle_hero_level_energizer, handle_two_tc, hero_level_energizer_parser,
            two_tc_parser,
        },
        command::{Command, format_command_error},
    },
    parser::{CommandParser, SchemaError},
    reactor::InvalidInputPolicy,
};

/// Command orchestrator for parsing and executing bot commands.
///
/// The Commander is responsible for:
/// - Recognizing commands addressed to the bot
/// - Routing commands to appropriate handlers
/// - Converting errors into user-friendly messages
///
/// # Command Prefix
///
/// All commands must start with `!<prefix>`. Messages without this prefix
/// are silently ignored (returning [`CommandParseError::NotForBot`]).
pub struct Commander {
    /// Command parser for processing user commands
    parser: Parser,
    /// Command name the bot answers to
    prefix: String,
    aliases: Arc<dyn AliasProvider>,
    combo_loader: ComboLoader,
    hero_level_energizer: CommandParser,
    two_tc: CommandParser,
    /// Policy of the free-text steps of interactive commands
    invalid_input: InvalidInputPolicy,
}

impl Commander {
    /// Creates a new Commander and builds the argument parsers of every command.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Command name the bot answers to, e.g. `q` for `!q help`
    /// * `aliases` - Lookup tables handed to the leaf parsers
    /// * `combo_loader` - Source of the 2tc combos
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if a command parser tree is inconsistent with
    /// its command schema.
    pub fn new(
        prefix: &str,
        aliases: Arc<dyn AliasProvider>,
        combo_loader: ComboLoader,
    ) -> Result<Self, SchemaError> {
        Ok(Commander {
            parser: Parser::new('!', '-'),
            prefix: prefix.to_string(),
            hero_level_energizer: hero_level_energizer_parser(aliases.clone())?,
            two_tc: two_tc_parser(aliases.clone())?,
            aliases,
            combo_loader,
            invalid_input: InvalidInputPolicy::default(),
        })
    }

    /// Sets what free-text steps do with a reply they cannot parse.
    pub fn with_invalid_input_policy(mut self, policy: InvalidInputPolicy) -> Self {
        self.invalid_input = policy;
        self
    }

    /// Parses a Matrix message body into a structured command.
    ///
    /// # Returns
    ///
    /// * `Ok(Command)` - Recognized command
    /// * `Err(CommandParseError::NotForBot)` - Message is not a command or for a different bot
    /// * `Err(CommandParseError::InvalidCommand)` - Unknown subcommand
    pub fn parse(&self, body: &str) -> Result<Command, CommandParseError> {
        Command::parse(&self.parser, &self.prefix, body).map_err(|error| {
            // Return silently if the command is not for the bot
            match format_command_error(error, &self.prefix) {
                Some(message) => CommandParseError::InvalidCommand(message),
                None => CommandParseError::NotForBot,
            }
        })
    }

    /// Executes a parsed command and returns the result.
    ///
    /// # Command Handlers
    ///
    /// - [`Command::Help`] → [`handle_help`]
    /// - [`Command::HeroLevelEnergizer`] → [`handle_hero_level_energizer`]
    /// - [`Command::TwoTc`] → [`handle_two_tc`]
    pub async fn parse_command(&self, command: &Command) -> CommandResult {
        match command {
            Command::Help => handle_help(&self.prefix),
            Command::HeroLevelEnergizer(arguments) => {
                handle_hero_level_energizer(
                    &self.hero_level_energizer,
                    arguments,
                    &self.prefix,
                    self.invalid_input,
                )
            }
            Command::TwoTc(arguments) => {
                handle_two_tc(
                    &self.two_tc,
                    arguments,
                    self.aliases.as_ref(),
                    &self.combo_loader,
                    &self.prefix,
                )
                .await
            }
        }
    }
}
