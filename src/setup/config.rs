//! Configuration for running this bot.

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;

/// The path to the config file
const CONFIG_PATH: &str = "config.toml";

/// Settings read from [CONFIG_PATH] that modify bot behavior.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Credentials for the reddit account the bot runs as.
    reddit: Credentials,

    /// See [CacheConfig]
    cache: CacheConfig,

    /// See [LoggingConfig]
    logging: LoggingConfig,

    /// Useful developer specific configs.
    dev_utils: DevConfig,
}

impl Config {
    /// Tries to read [CONFIG_PATH] to extract a [Config].
    /// If a file doesn't exists, create the default config file and returns error.
    /// If a file exists but is empty, re-write the default values and return error.
    /// If a file exists but is incomplete, show error and don't change files.
    /// If a file exists and is complete, read file to create a config.
    /// If file existance is indeterminent (e.g. missing permissions), return error.
    pub fn read() -> Result<Config, ConfigError> {
        Config::read_from(Path::new(CONFIG_PATH))
    }

    fn read_from(path: &Path) -> Result<Config, ConfigError> {
        let file = std::fs::read_to_string(path);

        match file {
            // Config file found
            Ok(content) => {
                // Write default values to file if it's empty.
                if content.trim().is_empty() {
                    write_file(Config::default(), path)?;
                    Err(ConfigError::InvalidConfig {
                        reason: format!("Empty config file! Rewriting {} ...", path.display()),
                    })
                } else {
                    // If deserialization fails, return error describing the mistake.
                    let to_toml = toml::Deserializer::new(&content);
                    let result: Result<Config, _> = serde_path_to_error::deserialize(to_toml);

                    result.map_err(|error| ConfigError::InvalidConfig {
                        reason: error.to_string(),
                    })
                }
            }
            // File not found or other filesystem error
            Err(file_error) => {
                match file_error.kind() {
                    // If file doesn't exist, create default config file.
                    std::io::ErrorKind::NotFound => {
                        let action = format!("Creating {}...", path.display());
                        write_file(Config::default(), path)?;
                        Err(ConfigError::MissingConfig { action_msg: action })
                    }
                    // If we can't determine that config file exist: return the error untouched.
                    _ => Err(ConfigError::IoError(file_error)),
                }
            }
        }
    }

    /// Basic sanity check that real credentials were filled in.
    pub fn credentials(&self) -> Result<&Credentials, ConfigError> {
        let defaults = Config::default().reddit;
        let given = &self.reddit;

        let is_empty = given.client_id.is_empty() || given.username.is_empty();
        let contains_default = given.client_id.contains(&defaults.client_id)
            || given.username.contains(&defaults.username);

        let sanity_check: bool = !is_empty && !contains_default;

        if sanity_check {
            Ok(given)
        } else {
            Err(ConfigError::InvalidConfig {
                reason: "Missing reddit credentials".to_string(),
            })
        }
    }

    /// Where the Redis server lives.
    pub fn cache_url(&self) -> &str {
        &self.cache.url
    }

    /// Getter for log_dir.
    pub fn log_dir(&self) -> &str {
        &self.logging.log_dir
    }

    /// Is debug mode enabled for console logs
    pub fn console_debug(&self) -> bool {
        self.logging.console_debug
    }

    /// Is file logging enabled.
    pub fn logs_enabled(&self) -> bool {
        self.logging.logs_enabled
    }

    /// Should the bot run against its testing subreddit.
    pub fn debug_mode(&self) -> bool {
        self.dev_utils.debug_mode
    }

    /// Minutes between configuration refreshes from the wiki.
    pub fn refresh_minutes(&self) -> u64 {
        self.dev_utils.refresh_minutes
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reddit: Credentials {
                client_id: "put_client_id_here".to_string(),
                client_secret: "put_client_secret_here".to_string(),
                username: "put_bot_username_here".to_string(),
                password: "put_bot_password_here".to_string(),
                user_agent: "scribe-bot (by /u/your_username)".to_string(),
            },

            cache: CacheConfig {
                url: "redis://127.0.0.1:6379/0".to_string(),
            },

            logging: LoggingConfig {
                console_debug: false,
                logs_enabled: true,
                log_dir: "logs".to_string(),
            },

            dev_utils: DevConfig {
                debug_mode: false,
                refresh_minutes: 30,
            },
        }
    }
}

/// A script app's OAuth credentials plus the account it logs in as.
#[derive(Debug, Serialize, Deserialize)]
pub struct Credentials {
    /// The app id from the account's app preferences.
    pub client_id: String,
    /// The matching app secret.
    pub client_secret: String,
    /// Account the bot posts as.
    pub username: String,
    pub password: String,
    /// Reddit asks for a descriptive user agent naming the bot and owner.
    pub user_agent: String,
}

/// Where to find the cache.
#[derive(Debug, Serialize, Deserialize)]
struct CacheConfig {
    /// Connection url of the Redis server.
    url: String,
}

/// Configs for logging.
#[derive(Debug, Serialize, Deserialize)]
struct LoggingConfig {
    /// Print debug traces to console?
    console_debug: bool,
    /// Enable writing to log file?
    logs_enabled: bool,
    /// Directory to store log files
    log_dir: String,
}

/// Optional configs to enable developer-specific behavior.
#[derive(Debug, Serialize, Deserialize)]
struct DevConfig {
    /// Run against the testing subreddit instead of the real one.
    debug_mode: bool,
    /// Minutes between wiki refreshes.
    refresh_minutes: u64,
}

/// Write the given config to `path`.
fn write_file(config: Config, path: &Path) -> Result<(), ConfigError> {
    use std::fs::write;

    let content = toml::to_string_pretty(&config).expect("config serialization can't fail");
    write(path, content).map_err(ConfigError::IoError)
}
