//! HTTP client for the Slack Web API.
//!
//! This module provides the [`SlackRequester`] struct, which calls the few Web
//! API methods the bot needs with the bot token as bearer credential.

use log::{debug, info};
use mockall::automock;
use reqwest::Client;
use serde_json::{Value, json};

use crate::slack::{
    SlackError,
    response_structs::{
        AuthTestResponse, PostMessageResponse, RtmConnectResponse, parse_response,
    },
};

/// HTTP client for the Slack Web API.
///
/// # Examples
///
/// ```no_run
/// let requester = SlackRequester::new("https://slack.com/api", "xoxb-token");
/// let auth = requester.auth_test().await?;
/// println!("Bot user: {}", auth.user_id);
/// ```
pub struct SlackRequester {
    /// Base URL of the Web API, e.g. `https://slack.com/api`
    url: String,
    /// Bot user OAuth token
    token: String,
    /// HTTP client
    client: Client,
}

/// Trait for calling the Slack Web API.
///
/// This trait abstracts the HTTP operations for easier testing with mocks.
#[automock]
pub trait Requester {
    /// Fetches the identity of the token owner.
    async fn auth_test(&self) -> Result<AuthTestResponse, SlackError>;
    /// Opens a real-time session and returns its WebSocket URL.
    async fn rtm_connect(&self) -> Result<RtmConnectResponse, SlackError>;
    /// Posts a text message to a channel, given by id or name.
    async fn post_message(&self, channel: &str, text: &str) -> Result<(), SlackError>;
}

impl SlackRequester {
    /// Create a new [SlackRequester].
    ///
    /// # Arguments
    ///
    /// * `url` - The base URL of the Web API, without trailing slash.
    /// * `token` - The bot token.
    pub fn new(url: &str, token: &str) -> Self {
        let client = reqwest::Client::new();
        SlackRequester {
            url: url.to_string(),
            token: token.to_string(),
            client,
        }
    }
}

impl Requester for SlackRequester {
    /// Request `auth.test` to get the bot user id and name.
    ///
    /// ```
    /// { "ok": true, "url": "https://team.slack.com/", "team": "Team",
    ///   "user": "safehouse", "team_id": "T123", "user_id": "U123" }
    /// ```
    async fn auth_test(&self) -> Result<AuthTestResponse, SlackError> {
        let url = format!("{}/auth.test", &self.url);
        info!("request bot identity");
        debug!("request {}", &url);

        let body: Value = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .json()
            .await?;

        debug!("response from {} -> {}", &url, &body);

        parse_response(body)
    }

    /// Request `rtm.connect` to open a real-time session.
    ///
    /// ```
    /// { "ok": true, "url": "wss://...", "team": {...}, "self": {...} }
    /// ```
    async fn rtm_connect(&self) -> Result<RtmConnectResponse, SlackError> {
        let url = format!("{}/rtm.connect", &self.url);
        info!("request real-time session");
        debug!("request {}", &url);

        let body: Value = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .json()
            .await?;

        // The WebSocket URL embeds a session ticket, keep it out of the logs
        debug!("response from {} -> ok={}", &url, &body["ok"]);

        parse_response(body)
    }

    /// Request `chat.postMessage` with a JSON body.
    async fn post_message(&self, channel: &str, text: &str) -> Result<(), SlackError> {
        let url = format!("{}/chat.postMessage", &self.url);
        debug!("request {} for channel {}", &url, channel);

        let body: Value = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&json!({
                "channel": channel,
                "text": text,
            }))
            .send()
            .await?
            .json()
            .await?;

        let response: PostMessageResponse = parse_response(body)?;
        debug!(
            "message posted to {} with ts {}",
            response.channel, response.ts
        );

        Ok(())
    }
}
