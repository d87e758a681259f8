//! Error types for building and refreshing the bot.

use thiserror::Error;

/// Anything that can go wrong while assembling the bot or rebuilding its
/// configuration from the wiki.
#[derive(Error, Debug)]
pub enum ScribeError {
    /// Problems with the local config file. See [ConfigError].
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Reddit rejected our credentials or returned an unusable token.
    #[error("Reddit login failed: {reason}")]
    Auth { reason: String },

    /// A wiki page could not be fetched. Carries the page name so the log
    /// line identifies which part of the configuration is stale.
    #[error("Failed to fetch wiki page '{page}'.")]
    Fetch {
        page: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A wiki page was fetched but its contents were malformed.
    #[error("Failed to parse wiki page '{page}'.")]
    Parse {
        page: String,
        #[source]
        source: ParseError,
    },

    /// The Redis server did not answer our ping.
    #[error("Could not reach the Redis server.")]
    CacheConnection(#[source] redis::RedisError),

    /// The cache was turned off when the bot was built, but something
    /// tried to use it anyway.
    #[error("The cache was disabled when this bot was built.")]
    CacheDisabled,

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors from reading or writing the config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing config file. {action_msg}")]
    MissingConfig { action_msg: String },

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    IoError(std::io::Error),
}

/// Wiki text that cannot be turned into configuration values.
///
/// Only numeric fields fail loudly. Structural oddities (a line without a
/// separator, a domain block with an unknown category) are skipped by the
/// parsers instead, since moderators edit these pages by hand.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Line {line}: expected an integer, found '{value}'.")]
    BadInteger { line: usize, value: String },

    #[error("The first line must hold the default archive time.")]
    MissingDefault,
}
