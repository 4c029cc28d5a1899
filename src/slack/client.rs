//! Slack client wrapper for bot messaging and synchronization.
//!
//! This module provides a high-level [`SlackClient`] interface that wraps the
//! Web API requester and the real-time session, and hands out the
//! [`SlackSender`] used to reply.

use std::sync::Arc;

use log::{error, info};

use crate::slack::{
    BotIdentity, EventHandler, SlackError, Transport, requester::Requester, sync::SlackSync,
};

/// High-level Slack client for bot messaging operations.
pub struct SlackClient<R: Requester> {
    /// Web API requester, shared with the senders and the session loop
    requester: Arc<R>,
    /// Real-time session service
    slack_sync: SlackSync<R>,
}

impl<R: Requester> SlackClient<R> {
    /// Creates a new Slack client. Nothing is requested before
    /// [`SlackClient::resolve_identity`] or [`SlackClient::sync`].
    ///
    /// # Arguments
    ///
    /// * `requester` - Web API requester holding the bot token
    /// * `reconnect` - Open a new real-time session when the current one ends
    pub fn new(requester: R, reconnect: bool) -> Self {
        let requester = Arc::new(requester);
        let slack_sync = SlackSync::new(Arc::clone(&requester), reconnect);

        SlackClient {
            requester,
            slack_sync,
        }
    }

    /// Resolves the bot account behind the token with `auth.test`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    pub async fn resolve_identity(&self) -> Result<BotIdentity, SlackError> {
        let auth = self.requester.auth_test().await?;
        Ok(BotIdentity::new(&auth.user_id, &auth.user))
    }

    /// Runs the real-time session and dispatches its events to `handler`.
    ///
    /// See [`SlackSync::sync`] for the reconnection behavior.
    pub async fn sync<H: EventHandler>(&self, handler: &H) -> Result<(), SlackError> {
        info!("start syncing");
        self.slack_sync.sync(handler).await
    }

    /// Returns a sender posting messages with this client's requester.
    pub fn transport(&self) -> SlackSender<R> {
        SlackSender {
            requester: Arc::clone(&self.requester),
        }
    }
}

/// [`Transport`] posting messages with `chat.postMessage`.
pub struct SlackSender<R: Requester> {
    requester: Arc<R>,
}

impl<R: Requester> Transport for SlackSender<R> {
    async fn send_message(&self, channel: &str, text: &str) {
        if let Err(e) = self.requester.post_message(channel, text).await {
            error!("Failed to send message to {}: {}", channel, e);
        }
    }
}
