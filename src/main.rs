//! Startup for a reddit transcription-moderation bot.
//!
//! The bot keeps its working configuration on its subreddit's wiki, from
//! the list of monitored subreddits down to the reply templates. Startup
//! logs in to reddit, checks the Redis cache, and rebuilds the whole
//! configuration store from the wiki before anything else runs. After
//! that the store is refreshed from the wiki on an interval.

mod cache;
mod error;
mod log;
mod parse;
mod populate;
mod reddit;
mod setup;
mod store;

use std::time::Duration;

use tracing::info;
use tracing::warn;

pub use crate::error::ScribeError;
pub use crate::setup::Config;

use crate::setup::Bootstrap;

#[tokio::main]
async fn main() -> Result<(), ScribeError> {
    let config = Config::read()?;

    // Keep the guard so buffered file logs flush on shutdown.
    let _guard = log::install_tracing(&config);

    let refresh = Duration::from_secs(config.refresh_minutes().max(1) * 60);
    let bot = Bootstrap::builder().config(config).build().run().await?;

    if bot.cache.is_connected() {
        info!("Redis cache is ready.");
    }

    // The wiki is the source of truth for configuration, so pick up edits
    // periodically. A failed refresh keeps the previous values.
    let mut refresh_timer = tokio::time::interval(refresh);
    refresh_timer.tick().await; // the first tick fires immediately
    loop {
        refresh_timer.tick().await;
        match populate::initialize(&bot.subreddit, &bot.store).await {
            Ok(()) => info!("Configuration refreshed from the wiki."),
            Err(e) => warn!("Configuration refresh failed: {e}"),
        }
    }
}
