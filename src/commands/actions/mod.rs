//! Command action handlers.
//!
//! Individual handler functions for each bot command. Handlers that take
//! arguments receive the [`CommandParser`](crate::parser::CommandParser) built
//! once by the [`Commander`](crate::commands::Commander) for their command.
//!
//! # Available Handlers
//!
//! - [`handle_help`] - Display help information
//! - [`handle_hero_level_energizer`] - Hero leveling with the Energizer, interactive
//! - [`handle_two_tc`] - Two-tower CHIMPS combos lookup

mod help;
mod hero_level_energizer;
mod two_tc;

pub use crate::commands::actions::{
    help::handle_help,
    hero_level_energizer::{handle_hero_level_energizer, hero_level_energizer_parser},
    two_tc::{handle_two_tc, two_tc_parser},
};
