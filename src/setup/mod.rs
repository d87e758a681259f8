//! Assembles a runnable bot from configuration.

mod config;

use std::sync::Arc;

use tracing::error;
use tracing::info;

use crate::cache::Cache;
use crate::error::ScribeError;
use crate::populate;
use crate::reddit::BotSubreddit;
use crate::reddit::RedditClient;
use crate::store::ConfigStore;

pub use config::Config;
pub use config::Credentials;

/// The subreddit the bot works out of during normal operation.
const PRIMARY_SUBREDDIT: &str = "scribesofreddit";
/// Alternate subreddit used in debug mode, so testing stays out of the
/// real queue.
const DEBUG_SUBREDDIT: &str = "ModsOfScribe";

/// A logged-in bot with a populated configuration store.
pub struct Bot {
    pub subreddit: BotSubreddit,
    pub cache: Cache,
    pub store: Arc<ConfigStore>,
}

/// Everything needed to build a [Bot].
///
/// `require_cache` is on by default; turn it off for one-shot tooling that
/// never touches the queue.
#[derive(bon::Builder)]
pub struct Bootstrap {
    config: Config,

    #[builder(default = true)]
    require_cache: bool,
}

impl Bootstrap {
    /// Logs in, checks the cache, and fills the configuration store from
    /// the wiki.
    ///
    /// A missing cache is fatal when one was required: the process exits
    /// with a non-zero status before any population step runs.
    pub async fn run(self) -> Result<Bot, ScribeError> {
        let credentials = self.config.credentials()?;
        let client = RedditClient::login(credentials).await?;

        let name = if self.config.debug_mode() {
            DEBUG_SUBREDDIT
        } else {
            // normal operation, our primary subreddit
            PRIMARY_SUBREDDIT
        };
        let subreddit = BotSubreddit::new(client, name);
        info!("Running on /r/{}.", subreddit.name());

        let cache = if self.require_cache {
            match Cache::connect(self.config.cache_url()).await {
                Ok(cache) => cache,
                Err(e) => {
                    error!("Redis server is not running! Exiting! ({e})");
                    std::process::exit(1);
                }
            }
        } else {
            Cache::disabled()
        };

        let store = Arc::new(ConfigStore::default());
        populate::initialize(&subreddit, &store).await?;

        info!("Bot built and initialized!");

        Ok(Bot {
            subreddit,
            cache,
            store,
        })
    }
}
