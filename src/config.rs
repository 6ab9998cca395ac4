//! Configuration file structures for the Quincy bot.
//!
//! The configuration is read from a YAML file and can be overridden by
//! environment variables prefixed with `QUINCY_`, nested keys being separated
//! by `__` (e.g. `QUINCY_MATRIX__PASSWORD`).
//!
//! # Configuration File Format
//!
//! ```yaml
//! matrix:
//!   # Fully qualified Matrix user ID for the bot account
//!   user_id: "@quincy:matrix.org"
//!   password: "secret-password"
//!   # Passphrase encrypting the local sqlite store
//!   passphrase: "store-passphrase"
//!
//! bot:
//!   # Commands are `!<prefix> <subcommand>`, defaults to `q`
//!   prefix: "q"
//!   # Seconds a user has to answer each question, defaults to 60
//!   reaction_timeout: 60
//!   # JSON dump of the 2tc combos, defaults to `<data>/combos.json`
//!   combos_file: "/var/lib/quincy/combos.json"
//!   # `reprompt` (default) asks again after an invalid reply, `abort` gives up
//!   invalid_input: "reprompt"
//! ```

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

use crate::reactor::InvalidInputPolicy;

/// Root configuration structure for the Quincy bot.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Matrix account configuration
    pub matrix: Matrix,
    /// Command behaviour, every field has a default
    #[serde(default)]
    pub bot: BotSettings,
}

/// Matrix account configuration.
#[derive(Debug, Deserialize)]
pub struct Matrix {
    /// Matrix ID of the bot account in the format `@username:homeserver.com`.
    pub user_id: String,

    /// Matrix account password.
    ///
    /// Used for initial login. After successful authentication, the session
    /// is persisted and the bot restores it without re-authenticating.
    pub password: String,

    /// Passphrase encrypting the matrix-sdk sqlite store.
    pub passphrase: String,
}

#[derive(Debug, Deserialize)]
pub struct BotSettings {
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Seconds per interactive step
    #[serde(default = "default_reaction_timeout")]
    pub reaction_timeout: u64,

    #[serde(default)]
    pub combos_file: Option<String>,

    /// What interactive steps do with a reply they cannot parse
    #[serde(default)]
    pub invalid_input: InvalidInputPolicy,
}

impl Default for BotSettings {
    fn default() -> Self {
        BotSettings {
            prefix: default_prefix(),
            reaction_timeout: default_reaction_timeout(),
            combos_file: None,
            invalid_input: InvalidInputPolicy::default(),
        }
    }
}

impl BotSettings {
    pub fn reaction_timeout(&self) -> Duration {
        Duration::from_secs(self.reaction_timeout)
    }
}

fn default_prefix() -> String {
    "q".to_string()
}

fn default_reaction_timeout() -> u64 {
    60
}

impl Config {
    /// Loads the configuration from the YAML file at `path`, then applies the
    /// `QUINCY_` environment overrides.
    ///
    /// # Errors
    ///
    /// Fails when a required value is missing from both sources or when a
    /// value has the wrong type.
    pub fn load(path: &str) -> anyhow::Result<Config> {
        let config = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("QUINCY_").split("__"))
            .extract()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;
    use tempfile::NamedTempFile;

    use super::*;

    const MINIMAL: &str = "matrix:\n  user_id: \"@quincy:example.com\"\n  password: \"secret\"\n  passphrase: \"phrase\"\n";

    fn config_file(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{content}").unwrap();
        temp_file
    }

    #[test]
    #[serial]
    fn test_load_minimal_config_uses_defaults() {
        let file = config_file(MINIMAL);
        let config = Config::load(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.matrix.user_id, "@quincy:example.com");
        assert_eq!(config.bot.prefix, "q");
        assert_eq!(config.bot.reaction_timeout(), Duration::from_secs(60));
        assert!(config.bot.combos_file.is_none());
        assert_eq!(config.bot.invalid_input, InvalidInputPolicy::RePrompt);
    }

    #[test]
    #[serial]
    fn test_load_bot_settings() {
        let file = config_file(&format!(
            "{MINIMAL}bot:\n  prefix: \"quincy\"\n  reaction_timeout: 15\n  combos_file: \"/tmp/combos.json\"\n"
        ));
        let config = Config::load(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.bot.prefix, "quincy");
        assert_eq!(config.bot.reaction_timeout, 15);
        assert_eq!(config.bot.combos_file.as_deref(), Some("/tmp/combos.json"));
    }

    #[test]
    #[serial]
    fn test_load_invalid_input_policy() {
        let file = config_file(&format!("{MINIMAL}bot:\n  invalid_input: \"abort\"\n"));
        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.bot.invalid_input, InvalidInputPolicy::Abort);

        let file = config_file(&format!("{MINIMAL}bot:\n  invalid_input: \"sometimes\"\n"));
        assert!(Config::load(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    #[serial]
    fn test_environment_overrides_file() {
        let file = config_file(MINIMAL);
        // SAFETY: tests touching the environment are serialized
        unsafe {
            std::env::set_var("QUINCY_MATRIX__PASSWORD", "from-env");
            std::env::set_var("QUINCY_BOT__REACTION_TIMEOUT", "5");
        }

        let config = Config::load(file.path().to_str().unwrap());

        unsafe {
            std::env::remove_var("QUINCY_MATRIX__PASSWORD");
            std::env::remove_var("QUINCY_BOT__REACTION_TIMEOUT");
        }

        let config = config.unwrap();
        assert_eq!(config.matrix.password, "from-env");
        assert_eq!(config.bot.reaction_timeout, 5);
    }

    #[test]
    #[serial]
    fn test_missing_credentials_fails() {
        let file = config_file("bot:\n  prefix: \"q\"\n");
        assert!(Config::load(file.path().to_str().unwrap()).is_err());
    }
}
