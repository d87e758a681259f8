//! Population steps that rebuild the [ConfigStore] from the wiki.
//!
//! Every step follows the same shape: fetch the pages it owns, parse them
//! into local values, then swap the finished group into the store in one
//! assignment. Nothing is cleared up front, so a fetch that dies halfway
//! leaves the previous configuration intact. Steps are independent of each
//! other and safe to re-run at any time.

use itertools::Itertools;
use tracing::debug;

use crate::error::ScribeError;
use crate::parse;
use crate::reddit::Platform;
use crate::store::ConfigStore;
use crate::store::Formatting;
use crate::store::SubredditLists;

/// Loads the approved content domains.
pub async fn populate_domain_lists(
    platform: &impl Platform,
    store: &ConfigStore,
) -> Result<(), ScribeError> {
    let domains = parse::domain_blocks(&platform.wiki_page("domains").await?);
    debug!(
        "Domain lists populated: {} video, {} image, {} audio",
        domains.video.len(),
        domains.image.len(),
        domains.audio.len()
    );

    *store.domains.write().await = domains;
    Ok(())
}

/// Loads the subreddit monitoring lists and their per-subreddit overrides.
pub async fn populate_subreddit_lists(
    platform: &impl Platform,
    store: &ConfigStore,
) -> Result<(), ScribeError> {
    let subreddits_to_check = parse::line_list(&platform.wiki_page("subreddits").await?);
    debug!(
        "Created list of subreddits from wiki: {}",
        subreddits_to_check.iter().join(", ")
    );

    let upvote_filter_subs = parse::key_value_lines(
        &platform.wiki_page("subreddits/upvote-filtered").await?,
    )
    .map_err(|source| ScribeError::Parse {
        page: "subreddits/upvote-filtered".to_string(),
        source,
    })?;
    debug!("Subreddits subject to the upvote filter: {upvote_filter_subs:?}");

    let no_link_header_subs =
        parse::line_list(&platform.wiki_page("subreddits/no-link-header").await?);
    debug!(
        "Subreddits that go without the link header: {}",
        no_link_header_subs.iter().join(", ")
    );

    let (archive_time_default, archive_time_subreddits) =
        parse::archive_times(&platform.wiki_page("subreddits/archive-time").await?).map_err(
            |source| ScribeError::Parse {
                page: "subreddits/archive-time".to_string(),
                source,
            },
        )?;

    *store.subreddits.write().await = SubredditLists {
        subreddits_to_check,
        upvote_filter_subs,
        no_link_header_subs,
        archive_time_default,
        archive_time_subreddits,
    };
    Ok(())
}

/// Loads the three reply templates.
pub async fn populate_formatting(
    platform: &impl Platform,
    store: &ConfigStore,
) -> Result<(), ScribeError> {
    let audio = platform.wiki_page("format/audio").await?;
    let video = platform.wiki_page("format/video").await?;
    let image = platform.wiki_page("format/images").await?;

    *store.formatting.write().await = Formatting { audio, video, image };
    Ok(())
}

/// Loads the header prepended to every reply.
pub async fn populate_header(
    platform: &impl Platform,
    store: &ConfigStore,
) -> Result<(), ScribeError> {
    let header = platform.wiki_page("format/header").await?;

    *store.header.write().await = header;
    Ok(())
}

/// Caches the moderator list. The API never caches it for us, so this cuts
/// the call volume down to one request per refresh.
pub async fn populate_moderators(
    platform: &impl Platform,
    store: &ConfigStore,
) -> Result<(), ScribeError> {
    let moderators = platform.moderators().await?;
    debug!("Moderators on record: {}", moderators.iter().join(", "));

    *store.moderators.write().await = moderators;
    Ok(())
}

/// Loads the list of subreddits that do not want gif replies.
pub async fn populate_gifs(
    platform: &impl Platform,
    store: &ConfigStore,
) -> Result<(), ScribeError> {
    let no_gifs = parse::line_list(&platform.wiki_page("usefulgifs/no").await?);

    *store.no_gifs.write().await = no_gifs;
    Ok(())
}

/// Runs every population step, in a fixed order.
///
/// The order only matters for log readability; the steps own disjoint parts
/// of the store.
pub async fn initialize(
    platform: &impl Platform,
    store: &ConfigStore,
) -> Result<(), ScribeError> {
    populate_domain_lists(platform, store).await?;
    debug!("Domains loaded.");
    populate_subreddit_lists(platform, store).await?;
    debug!("Subreddits loaded.");
    populate_formatting(platform, store).await?;
    debug!("Formatting loaded.");
    populate_header(platform, store).await?;
    debug!("Header loaded.");
    populate_moderators(platform, store).await?;
    debug!("Mod list loaded.");
    populate_gifs(platform, store).await?;
    debug!("Gifs loaded.");
    Ok(())
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;

    /// Serves canned wiki text instead of talking to reddit.
    struct FakeWiki {
        pages: HashMap<&'static str, &'static str>,
        moderators: Vec<String>,
    }

    #[async_trait]
    impl Platform for FakeWiki {
        async fn wiki_page(&self, page: &str) -> Result<String, ScribeError> {
            match self.pages.get(page) {
                Some(text) => Ok((*text).to_string()),
                None => Err(ScribeError::Fetch {
                    page: page.to_string(),
                    source: "no such fixture".into(),
                }),
            }
        }

        async fn moderators(&self) -> Result<Vec<String>, ScribeError> {
            Ok(self.moderators.clone())
        }
    }

    fn fixture() -> FakeWiki {
        let pages = HashMap::from([
            (
                "domains",
                "video[youtube.com, vimeo.com]---audio[clyp.it]---images[i.imgur.com]",
            ),
            ("subreddits", "ProgrammerHumor\r\nPics\r\n\r\nAww"),
            ("subreddits/upvote-filtered", "pics,10\nfunny,25"),
            ("subreddits/no-link-header", "NoContextPics"),
            ("subreddits/archive-time", "600\nPics,100\nAww,200"),
            ("format/audio", "audio template"),
            ("format/video", "video template"),
            ("format/images", "image template"),
            ("format/header", "header text"),
            ("usefulgifs/no", "gifless\r\nalso_gifless"),
        ]);
        FakeWiki {
            pages,
            moderators: vec!["modone".to_string(), "modtwo".to_string()],
        }
    }

    #[tokio::test]
    async fn initialize_fills_every_field() {
        let wiki = fixture();
        let store = ConfigStore::default();

        initialize(&wiki, &store).await.unwrap();

        let domains = store.domains.read().await;
        assert!(domains.video.contains("youtube.com"));
        assert!(domains.video.contains("vimeo.com"));
        assert!(domains.audio.contains("clyp.it"));
        assert!(domains.image.contains("i.imgur.com"));

        let subreddits = store.subreddits.read().await;
        assert_eq!(
            subreddits.subreddits_to_check,
            vec!["ProgrammerHumor", "Pics", "Aww"]
        );
        assert_eq!(subreddits.upvote_filter_subs["pics"], 10);
        assert_eq!(subreddits.upvote_filter_subs["funny"], 25);
        assert_eq!(subreddits.no_link_header_subs, vec!["NoContextPics"]);
        assert_eq!(subreddits.archive_time_default, 600);
        assert_eq!(subreddits.archive_time_subreddits["pics"], 100);
        assert_eq!(subreddits.archive_time_subreddits["aww"], 200);

        let formatting = store.formatting.read().await;
        assert_eq!(formatting.audio, "audio template");
        assert_eq!(formatting.video, "video template");
        assert_eq!(formatting.image, "image template");

        assert_eq!(*store.header.read().await, "header text");
        assert_eq!(*store.moderators.read().await, vec!["modone", "modtwo"]);
        assert_eq!(
            *store.no_gifs.read().await,
            vec!["gifless", "also_gifless"]
        );
    }

    #[tokio::test]
    async fn steps_are_idempotent() {
        let wiki = fixture();
        let store = ConfigStore::default();

        initialize(&wiki, &store).await.unwrap();
        let first_domains = store.domains.read().await.clone();
        let first_subreddits = store.subreddits.read().await.clone();

        initialize(&wiki, &store).await.unwrap();

        assert_eq!(*store.domains.read().await, first_domains);
        assert_eq!(*store.subreddits.read().await, first_subreddits);
        assert_eq!(store.no_gifs.read().await.len(), 2);
    }

    #[tokio::test]
    async fn a_failed_fetch_keeps_the_previous_values() {
        let wiki = fixture();
        let store = ConfigStore::default();
        initialize(&wiki, &store).await.unwrap();

        // Same fixture minus the archive-time page, fetched last by the
        // subreddit step. The step must not leave the group half-updated.
        let mut broken = fixture();
        broken.pages.remove("subreddits/archive-time");
        broken.pages.insert("subreddits", "OnlyThisOne");

        let err = populate_subreddit_lists(&broken, &store)
            .await
            .unwrap_err();
        assert!(matches!(err, ScribeError::Fetch { ref page, .. } if page == "subreddits/archive-time"));

        let subreddits = store.subreddits.read().await;
        assert_eq!(
            subreddits.subreddits_to_check,
            vec!["ProgrammerHumor", "Pics", "Aww"]
        );
        assert_eq!(subreddits.archive_time_default, 600);
    }

    #[tokio::test]
    async fn malformed_thresholds_name_the_page() {
        let mut wiki = fixture();
        wiki.pages
            .insert("subreddits/upvote-filtered", "pics,plenty");
        let store = ConfigStore::default();

        let err = populate_subreddit_lists(&wiki, &store).await.unwrap_err();

        match err {
            ScribeError::Parse { page, source } => {
                assert_eq!(page, "subreddits/upvote-filtered");
                assert_eq!(
                    source,
                    crate::error::ParseError::BadInteger {
                        line: 1,
                        value: "plenty".to_string(),
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
