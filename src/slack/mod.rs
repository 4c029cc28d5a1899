//! Slack integration for the bot.
//!
//! This module talks to Slack in two ways:
//! - the Web API (`auth.test`, `rtm.connect`, `chat.postMessage`) over HTTPS
//! - the real-time messaging session, a WebSocket delivering events
//!
//! # Architecture
//!
//! - **Requester**: Web API calls, behind the [`Requester`] trait
//! - **Sync**: the real-time session loop, turning frames into [`EventHandler`] calls
//! - **Client**: ties both together and hands out the [`Transport`] used to reply
//!
//! # Examples
//!
//! ```no_run
//! let requester = SlackRequester::new("https://slack.com/api", "xoxb-token");
//! let client = SlackClient::new(requester, true);
//! let identity = client.resolve_identity().await?;
//! client.sync(&handler).await?;
//! ```

mod client;
mod requester;
mod response_structs;
mod structs;
mod sync;

use mockall::automock;
use thiserror::Error;

pub use crate::slack::client::SlackClient;
pub use crate::slack::requester::SlackRequester;
pub use crate::slack::structs::{BotIdentity, IncomingMessage};

/// Receives the events of a real-time session.
///
/// Events are delivered one at a time: the session does not read the next
/// frame before the current handler call has completed.
#[automock]
pub trait EventHandler {
    /// The session is established and ready.
    async fn on_connected(&self);
    /// A user posted a message in a channel the bot is a member of.
    async fn on_message(&self, message: IncomingMessage);
    /// The session was closed by Slack or dropped.
    async fn on_disconnected(&self);
}

/// One-way channel to post messages.
#[automock]
pub trait Transport {
    /// Posts `text` to `channel`. Delivery is best effort: failures are
    /// logged, not returned.
    async fn send_message(&self, channel: &str, text: &str);
}

/// Errors raised while talking to Slack.
#[derive(Error, Debug)]
pub enum SlackError {
    /// The HTTP request failed or its body could not be read
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// Slack answered with `ok: false` and this error code
    #[error("slack api error: {0}")]
    Api(String),
    /// A Web API response did not have the expected shape
    #[error("unexpected response: {0}")]
    Json(#[from] serde_json::Error),
    /// The real-time WebSocket failed
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Web API error codes that no retry can fix: the token is unusable.
const FATAL_API_ERRORS: [&str; 6] = [
    "invalid_auth",
    "not_authed",
    "account_inactive",
    "token_revoked",
    "token_expired",
    "not_allowed_token_type",
];

impl SlackError {
    /// Returns false when the error comes from a rejected credential.
    pub fn is_retryable(&self) -> bool {
        match self {
            SlackError::Api(code) => !FATAL_API_ERRORS.contains(&code.as_str()),
            _ => true,
        }
    }
}
