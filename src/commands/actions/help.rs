//! Help command handler.
//!
//! This is a stateless command that always returns the same help message.

use log::debug;

use crate::commands::{CommandResult, markdown_response::format_help};

/// Returns formatted help information about available commands.
pub fn handle_help(prefix: &str) -> CommandResult {
    debug!("handling help command");

    CommandResult::Reply(format_help(prefix))
}
