//! A small Reddit API client: login, wiki pages, moderator lists.
//!
//! Only the endpoints the bootstrap needs are implemented. The population
//! pipeline consumes this module through the [Platform] trait so tests can
//! substitute canned wiki text.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::error::ScribeError;
use crate::setup::Credentials;

/// Where password-grant tokens are issued.
const AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";
/// Every authenticated call goes through the OAuth host.
const API_BASE: &str = "https://oauth.reddit.com";

/// An authenticated Reddit session.
#[derive(Debug, Clone)]
pub struct RedditClient {
    http: reqwest::Client,
    token: String,
    api_base: Url,
}

/// The interesting part of a token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct WikiPage {
    data: WikiPageData,
}

#[derive(Debug, Deserialize)]
struct WikiPageData {
    content_md: String,
}

#[derive(Debug, Deserialize)]
struct ModeratorList {
    data: ModeratorListData,
}

#[derive(Debug, Deserialize)]
struct ModeratorListData {
    children: Vec<Moderator>,
}

#[derive(Debug, Deserialize)]
struct Moderator {
    name: String,
}

impl RedditClient {
    /// Logs in as a script app using the OAuth2 password grant.
    pub async fn login(credentials: &Credentials) -> Result<Self, ScribeError> {
        Self::login_at(credentials, AUTH_URL, API_BASE).await
    }

    // The urls are injectable so tests can point at a local server.
    async fn login_at(
        credentials: &Credentials,
        auth_url: &str,
        api_base: &str,
    ) -> Result<Self, ScribeError> {
        let http = reqwest::Client::builder()
            .user_agent(credentials.user_agent.as_str())
            .build()?;

        let form = [
            ("grant_type", "password"),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];

        let response = http
            .post(auth_url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&form)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| ScribeError::Auth {
                reason: e.to_string(),
            })?;

        let token: TokenResponse = response.json().await.map_err(|e| ScribeError::Auth {
            reason: format!("unreadable token response: {e}"),
        })?;

        Ok(RedditClient {
            http,
            token: token.access_token,
            api_base: Url::parse(api_base).expect("base url is valid"),
        })
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.api_base.clone();
        url.set_path(path);
        url
    }
}

/// What the population pipeline needs from the platform.
#[async_trait]
pub trait Platform {
    /// Fetches the raw markdown of a named wiki page.
    async fn wiki_page(&self, page: &str) -> Result<String, ScribeError>;

    /// Lists the usernames holding moderator privileges.
    async fn moderators(&self) -> Result<Vec<String>, ScribeError>;
}

/// A [RedditClient] bound to a single subreddit.
///
/// The bot only ever talks to its own subreddit, so carrying the name here
/// keeps the call sites short.
#[derive(Debug, Clone)]
pub struct BotSubreddit {
    client: RedditClient,
    name: String,
}

impl BotSubreddit {
    pub fn new(client: RedditClient, name: impl Into<String>) -> Self {
        BotSubreddit {
            client,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl Platform for BotSubreddit {
    async fn wiki_page(&self, page: &str) -> Result<String, ScribeError> {
        let url = self
            .client
            .endpoint(&format!("/r/{}/wiki/{}", self.name, page));

        let response = self
            .client
            .http
            .get(url)
            // Without raw_json, reddit html-escapes the markdown.
            .query(&[("raw_json", "1")])
            .bearer_auth(&self.client.token)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| ScribeError::Fetch {
                page: page.to_string(),
                source: e.into(),
            })?;

        let parsed: WikiPage = response.json().await.map_err(|e| ScribeError::Fetch {
            page: page.to_string(),
            source: e.into(),
        })?;

        Ok(parsed.data.content_md)
    }

    async fn moderators(&self) -> Result<Vec<String>, ScribeError> {
        let url = self
            .client
            .endpoint(&format!("/r/{}/about/moderators", self.name));

        let listing: ModeratorList = self
            .client
            .http
            .get(url)
            .bearer_auth(&self.client.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(listing
            .data
            .children
            .into_iter()
            .map(|moderator| moderator.name)
            .collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            username: "scribe".to_string(),
            password: "hunter2".to_string(),
            user_agent: "scribe-bot tests".to_string(),
        }
    }

    fn client_for(server: &mockito::Server) -> RedditClient {
        RedditClient {
            http: reqwest::Client::new(),
            token: "abc123".to_string(),
            api_base: Url::parse(&server.url()).unwrap(),
        }
    }

    #[tokio::test]
    async fn login_extracts_the_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/access_token")
            .with_body(
                r#"{"access_token": "abc123", "token_type": "bearer", "expires_in": 3600, "scope": "*"}"#,
            )
            .create_async()
            .await;

        let auth_url = format!("{}/api/v1/access_token", server.url());
        let client = RedditClient::login_at(&credentials(), &auth_url, &server.url())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(client.token, "abc123");
    }

    #[tokio::test]
    async fn login_failure_is_an_auth_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v1/access_token")
            .with_status(401)
            .create_async()
            .await;

        let auth_url = format!("{}/api/v1/access_token", server.url());
        let err = RedditClient::login_at(&credentials(), &auth_url, &server.url())
            .await
            .unwrap_err();

        assert!(matches!(err, ScribeError::Auth { .. }));
    }

    #[tokio::test]
    async fn wiki_page_returns_the_markdown() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/r/scribesofreddit/wiki/domains")
            .match_query(mockito::Matcher::UrlEncoded("raw_json".into(), "1".into()))
            .with_body(r#"{"kind": "wikipage", "data": {"content_md": "video[a.com]"}}"#)
            .create_async()
            .await;

        let subreddit = BotSubreddit::new(client_for(&server), "scribesofreddit");
        let text = subreddit.wiki_page("domains").await.unwrap();

        assert_eq!(text, "video[a.com]");
    }

    #[tokio::test]
    async fn wiki_fetch_failure_names_the_page() {
        // No mocks registered, so every request is rejected.
        let server = mockito::Server::new_async().await;

        let subreddit = BotSubreddit::new(client_for(&server), "scribesofreddit");
        let err = subreddit.wiki_page("format/header").await.unwrap_err();

        match err {
            ScribeError::Fetch { page, .. } => assert_eq!(page, "format/header"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn moderator_names_are_extracted() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/r/scribesofreddit/about/moderators")
            .with_body(
                r#"{"kind": "UserList", "data": {"children": [
                    {"name": "modone", "mod_permissions": ["all"]},
                    {"name": "modtwo", "mod_permissions": ["wiki"]}
                ]}}"#,
            )
            .create_async()
            .await;

        let subreddit = BotSubreddit::new(client_for(&server), "scribesofreddit");
        let moderators = subreddit.moderators().await.unwrap();

        assert_eq!(moderators, vec!["modone", "modtwo"]);
    }
}
