//! Command recognition.
//!
//! This module turns a Matrix message body into a [`Command`]: it checks the
//! bot prefix, resolves the subcommand (and its aliases) and keeps the
//! remaining words as raw argument tokens for the subcommand's grammar.

use command_parser::Parser;
use log::debug;

use crate::commands::markdown_response::format_unknown_command;

/// Subcommand names accepted for the hero level energizer calculator.
pub const HERO_LEVEL_ENERGIZER_ALIASES: &[&str] = &[
    "herolevelenergizer",
    "hle",
    "heroeng",
    "heroengz",
    "herenz",
    "henz",
    "heroenz",
    "herolevelenergiser",
    "energiser",
    "energizer",
];

/// A recognized bot command.
///
/// Argument-taking commands keep their tokens unparsed: each one has its own
/// argument grammar.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum Command {
    /// Display help information
    Help,
    /// Hero leveling with the Energizer
    HeroLevelEnergizer(Vec<String>),
    /// Two-tower CHIMPS combos lookup
    TwoTc(Vec<String>),
}

/// Errors that can occur during command recognition.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandParsingError {
    /// The message is not a command
    UnableToParse,
    /// The command is for another bot (other prefix)
    NotQuincy,
    /// The subcommand is not recognized
    Unknown,
}

impl Command {
    /// Parses a message body into a [`Command`].
    ///
    /// # Arguments
    ///
    /// * `parser` - The command parser configured with the `!` prefix
    /// * `prefix` - Command name the bot answers to, e.g. `q` for `!q help`
    /// * `body` - The message text
    ///
    /// # Errors
    ///
    /// - [`CommandParsingError::UnableToParse`] if the message is not a command
    /// - [`CommandParsingError::NotQuincy`] if the command name is not `prefix`
    /// - [`CommandParsingError::Unknown`] if the subcommand is not recognized
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let parser = Parser::new('!', '-');
    /// let command = Command::parse(&parser, "q", "!q hle gwen r40")?;
    /// assert_eq!(command, Command::HeroLevelEnergizer(vec!["gwen".into(), "r40".into()]));
    /// ```
    pub fn parse(parser: &Parser, prefix: &str, body: &str) -> Result<Self, CommandParsingError> {
        // The parser drops the last word, so a dummy one is appended
        let body = body.to_string() + " dummy";

        let command = match parser.parse(&body) {
            Ok(cmd) => cmd,
            Err(_) => return Err(CommandParsingError::UnableToParse),
        };

        if !command.name.eq_ignore_ascii_case(prefix) {
            return Err(CommandParsingError::NotQuincy);
        }

        debug!("parsing command: {:?}", command);

        let Some((subcommand, arguments)) = command.arguments.split_first() else {
            return Ok(Command::Help);
        };
        let arguments = arguments.to_vec();

        match subcommand.to_lowercase().as_str() {
            "help" => Ok(Command::Help),
            "2tc" => Ok(Command::TwoTc(arguments)),
            name if HERO_LEVEL_ENERGIZER_ALIASES.contains(&name) => {
                Ok(Command::HeroLevelEnergizer(arguments))
            }
            _ => Err(CommandParsingError::Unknown),
        }
    }
}

/// Formats a recognition error into a user-facing message.
///
/// Messages that are not commands for this bot produce no answer.
pub fn format_command_error(error: CommandParsingError, prefix: &str) -> Option<String> {
    match error {
        CommandParsingError::Unknown => Some(format_unknown_command(prefix)),
        _ => None,
    }
}
