//! The shared configuration store rebuilt from the subreddit wiki.

use std::collections::HashMap;
use std::collections::HashSet;

use tokio::sync::RwLock;

/// Approved content domains, by media category.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DomainLists {
    pub video: HashSet<String>,
    pub image: HashSet<String>,
    pub audio: HashSet<String>,
}

/// The subreddits we monitor, plus their per-subreddit overrides.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SubredditLists {
    /// Subreddits polled for new posts, in wiki order.
    pub subreddits_to_check: Vec<String>,
    /// Subreddits where posts below an upvote threshold are ignored.
    pub upvote_filter_subs: HashMap<String, i64>,
    /// Subreddits that asked us not to include the link header in replies.
    pub no_link_header_subs: Vec<String>,
    /// Seconds before an unclaimed post is archived.
    pub archive_time_default: i64,
    /// Per-subreddit archive overrides. Keys are lowercased.
    pub archive_time_subreddits: HashMap<String, i64>,
}

/// Reply templates, one per media category.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Formatting {
    pub audio: String,
    pub video: String,
    pub image: String,
}

/// The bot's working configuration, assembled from the wiki at startup and
/// replaced wholesale on refresh.
///
/// Fields are grouped by the population step that owns them, one lock per
/// group. A step writes its group in a single assignment under the write
/// lock, so readers never observe a half-filled group and a failed refresh
/// leaves the previous values in place.
#[derive(Debug, Default)]
pub struct ConfigStore {
    pub domains: RwLock<DomainLists>,
    pub subreddits: RwLock<SubredditLists>,
    pub formatting: RwLock<Formatting>,
    pub header: RwLock<String>,
    /// Usernames holding moderator privileges on our subreddit. Cached here
    /// so we do not ask the API every time we check a username.
    pub moderators: RwLock<Vec<String>>,
    /// Subreddits that do not want gif replies.
    pub no_gifs: RwLock<Vec<String>>,
}
