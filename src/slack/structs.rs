//! Public data structures shared by the Slack integration and the bot.

/// Identity of the bot account, resolved once at startup.
///
/// # Examples
///
/// ```
/// let identity = BotIdentity::new("U12345", "safehouse");
/// assert_eq!(identity.mention_token(), "<@U12345>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    /// Slack user id of the bot
    user_id: String,
    /// Slack user name of the bot
    name: String,
    /// Text other users type to address the bot
    mention_token: String,
}

impl BotIdentity {
    /// Creates an identity, deriving the mention token from the user id.
    pub fn new(user_id: &str, name: &str) -> Self {
        BotIdentity {
            user_id: user_id.to_owned(),
            name: name.to_owned(),
            mention_token: format!("<@{}>", user_id),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mention_token(&self) -> &str {
        &self.mention_token
    }
}

/// A message event received through the real-time session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Message text, with mentions in their `<@ID>` form
    pub text: String,
    /// Id of the channel the message was posted in
    pub channel: String,
    /// Id of the author, absent for some integration messages
    pub user: Option<String>,
}
