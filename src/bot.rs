//! Bot module reacting to the events of the Slack session.
//!
//! This module provides the main [`Bot`] implementation. The bot is the
//! [`EventHandler`] of the real-time session: it announces itself once
//! connected, answers the messages that mention it and carries out the delayed
//! shutdown requested by the `exit` command.
//!
//! # Command Processing Flow
//!
//! ```text
//! Slack message → Mention check → Strip mention → Commander → Reply → (Shutdown)
//! ```
//!
//! # Example
//!
//! ```no_run
//! let identity = slack_client.resolve_identity().await?;
//! let bot = Bot::new(identity, &config.bot, slack_client.transport(), Arc::new(SignalTerminator));
//! slack_client.sync(&bot).await?;
//! ```

use std::{fmt, sync::Arc};

use log::{debug, info, warn};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Duration},
};

use crate::{
    commands::{CommandContext, Commander},
    config,
    slack::{BotIdentity, EventHandler, IncomingMessage, Transport},
    terminator::Terminator,
    uptime::UptimeClock,
};

/// State of the real-time session, as last reported to the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connected => write!(f, "connected"),
        }
    }
}

/// Main bot structure answering the commands addressed to it.
///
/// The bot owns everything a command needs: its identity, the uptime clock and
/// the [`Commander`]. Replies go through a [`Transport`], and the process is
/// ended through a [`Terminator`] once the `exit` grace period is over.
///
/// # Thread Safety
///
/// The session state and the pending shutdown task are behind a `Mutex`, so
/// the bot is used through shared references only.
pub struct Bot<T: Transport, K: Terminator + Send + Sync + 'static> {
    /// Account of the bot, used to detect mentions and its own messages
    identity: BotIdentity,
    /// Name shown in the ping reply
    bot_name: String,
    /// Started when the bot is created
    clock: UptimeClock,
    /// Command parser and executor
    commander: Commander,
    /// Outbound messages
    transport: T,
    /// Ends the process after an `exit`
    terminator: Arc<K>,
    /// Channel used when a message has no explicit destination
    default_channel: String,
    /// Announcement sent once connected
    online_message: String,
    /// Delay between the exit notice and the termination
    shutdown_grace: Duration,
    /// Last reported session state
    state: Mutex<ConnectionState>,
    /// Delayed termination task, if an `exit` was received
    pending_shutdown: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Transport, K: Terminator + Send + Sync + 'static> Bot<T, K> {
    /// Creates a new Bot.
    ///
    /// # Arguments
    ///
    /// * `identity` - Bot account resolved at startup
    /// * `config` - Bot section of the configuration
    /// * `transport` - Sender used for every outbound message
    /// * `terminator` - Hook ending the process after `exit`
    pub fn new(
        identity: BotIdentity,
        config: &config::Bot,
        transport: T,
        terminator: Arc<K>,
    ) -> Self {
        let bot_name = config
            .name
            .clone()
            .unwrap_or_else(|| identity.name().to_owned());

        Bot {
            identity,
            bot_name,
            clock: UptimeClock::start(),
            commander: Commander::new(),
            transport,
            terminator,
            default_channel: config.default_channel.clone(),
            online_message: config.online_message.clone(),
            shutdown_grace: Duration::from_secs(config.shutdown_grace),
            state: Mutex::new(ConnectionState::Disconnected),
            pending_shutdown: Mutex::new(None),
        }
    }

    /// Sends `text` verbatim to `channel`, or to the default channel.
    ///
    /// Nothing is sent when `text` is empty.
    pub async fn send(&self, text: &str, channel: Option<&str>) {
        if text.is_empty() {
            return;
        }

        let channel = channel.unwrap_or(&self.default_channel);
        self.transport.send_message(channel, text).await;
    }

    /// Aborts the pending termination task, if any.
    pub async fn cancel_shutdown(&self) {
        if let Some(handle) = self.pending_shutdown.lock().await.take() {
            info!("cancel pending shutdown");
            handle.abort();
        }
    }

    /// Spawns the task ending the process once the grace period is over.
    ///
    /// Does nothing while a previous termination is still pending.
    async fn schedule_shutdown(&self) {
        let mut pending_shutdown = self.pending_shutdown.lock().await;

        if let Some(handle) = pending_shutdown.as_ref()
            && !handle.is_finished()
        {
            info!("shutdown already pending");
            return;
        }

        let grace = self.shutdown_grace;
        let terminator = Arc::clone(&self.terminator);
        info!("shutting down in {} seconds", grace.as_secs());

        *pending_shutdown = Some(tokio::spawn(async move {
            time::sleep(grace).await;
            terminator.terminate();
        }));
    }

    /// Extracts the command text following the bot mention.
    ///
    /// Returns `None` if the message does not mention the bot.
    fn command_body(&self, text: &str) -> Option<String> {
        let mention = self.identity.mention_token();
        let index = text.find(mention)?;
        Some(text[index + mention.len()..].trim().to_lowercase())
    }

    /// Returns the last reported session state.
    #[cfg(test)]
    async fn state(&self) -> ConnectionState {
        *self.state.lock().await
    }
}

impl<T: Transport, K: Terminator + Send + Sync + 'static> EventHandler for Bot<T, K> {
    async fn on_connected(&self) {
        *self.state.lock().await = ConnectionState::Connected;
        info!("{} is online", self.bot_name);
        self.send(&self.online_message, None).await;
    }

    async fn on_message(&self, message: IncomingMessage) {
        // Ignore own messages
        if message.user.as_deref() == Some(self.identity.user_id()) {
            return;
        }

        let Some(body) = self.command_body(&message.text) else {
            debug!("ignore message without mention in {}", message.channel);
            return;
        };

        let context = CommandContext {
            bot_name: self.bot_name.clone(),
            clock: self.clock,
        };
        let result = self.commander.handle(&body, &context);

        self.send(&result.response, Some(message.channel.as_str())).await;

        if result.shutdown {
            self.schedule_shutdown().await;
        }
    }

    async fn on_disconnected(&self) {
        let mut state = self.state.lock().await;
        warn!("{} lost the slack session, was {}", self.bot_name, *state);
        *state = ConnectionState::Disconnected;
    }
}
