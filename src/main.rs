//! Quincy - A Matrix bot answering BTD6 reference commands.
//!
//! Users ask for game references with `!q <command>`. Arguments can be given
//! in any order; whatever is missing is asked for interactively, the user
//! answering with a reaction on the bot's question or with a reply.
//!
//! # Configuration
//!
//! Create a `config.yaml` file with your settings:
//!
//! ```yaml
//! matrix:
//!   user_id: "@quincy:matrix.org"
//!   password: "your-password"
//!   passphrase: "your-store-passphrase"
//!
//! bot:
//!   prefix: "q"
//!   reaction_timeout: 60
//! ```
//!
//! Any value can be overridden with a `QUINCY_` environment variable, e.g.
//! `QUINCY_MATRIX__PASSWORD`.
//!
//! # Usage
//!
//! ```bash
//! quincy --config config.yaml --data ./quincy-data
//! ```
//!
//! # Bot Commands
//!
//! - `!q help` - Display help information
//! - `!q herolevelenergizer [hero] [round] [map_difficulty] [round]` - Hero leveling with the Energizer
//! - `!q 2tc [map] [tower [tower] | number] [u#person] [version]` - Two-tower CHIMPS combos
//!
//! # Architecture
//!
//! - [`parser`] - Composable argument parsers (leaves, optional, or, any order)
//! - [`aliases`] - Game alias tables handed to the parsers
//! - [`reactor`] - Interactive steps and the reaction chain collecting missing arguments
//! - [`transport`] - Chat events, outgoing messenger and the listener hub
//! - [`commands`] - Command recognition, handlers and Markdown responses
//! - [`combos`] - 2TC combo data, loading and filtering
//! - [`matrix`] - Matrix client integration and session management
//! - [`bot`] - Wiring of the above
//! - [`config`] - YAML configuration with environment variable overrides
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{bot::Bot, config::Config};

mod aliases;
mod bot;
mod combos;
mod commands;
mod config;
mod matrix;
mod parser;
mod reactor;
#[cfg(test)]
mod scenarios;
mod transport;
mod utils;

/// Command-line arguments for the Quincy bot.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(short, long)]
    config: String,

    /// Path to the directory for storing persistent data.
    ///
    /// This directory will contain:
    /// - `session/` - Matrix session data (authentication tokens, sqlite store)
    /// - `combos.json` - 2TC combos, unless `bot.combos_file` is configured
    #[arg(short, long)]
    data: String,
}

#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("starting quincy {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("failed to load config file: {}", e);
            return;
        }
    };

    let bot = match Bot::new(config, args).await {
        Ok(bot) => bot,
        Err(e) => {
            error!("failed to initialize bot: {}", e);
            return;
        }
    };
    bot.start().await;
}
