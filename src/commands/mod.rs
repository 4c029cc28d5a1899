//! Bot command parsing, dispatch and response formatting.
//!
//! This module turns the text following a bot mention into a reply.
//!
//! # Overview
//!
//! 1. **Tokenizing** - Shell-style splitting into a [`command::CommandInvocation`]
//! 2. **Validation** - The command name must be present in the [`table::CommandTable`]
//! 3. **Execution** - Routing to the action handlers
//! 4. **Response** - Plain text or monospace blocks for Slack display
//!
//! # Architecture
//!
//! ```text
//! mention text
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Commander  │  ← Entry point: handle()
//! └─────────────┘
//!      │
//!      ├── CommandInvocation::parse() ── shell-style tokens
//!      │
//!      ├── Command::parse() ──────────── table lookup
//!      │
//!      └── Action Handlers
//!            - handle_help
//!            - handle_ping
//!            - handle_exit
//!            - handle_filter
//!                 │
//!                 ▼
//!          ┌────────────────┐
//!          │ CommandResult  │
//!          │  - response    │
//!          │  - shutdown    │
//!          └────────────────┘
//! ```
//!
//! # Available Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `help` | Display the command table |
//! | `ping` | Report the bot uptime |
//! | `exit`, `quit` | Shut the bot down after a grace period |
//! | `list`, `add`, `del`, `clear`, `raise` | Reserved filter commands, no reply |
//!
//! # Error Handling
//!
//! Errors never escape the dispatcher: unbalanced quoting and unknown commands
//! are turned into plain-text replies so the user always gets an answer.

use crate::uptime::UptimeClock;

mod actions;
mod command;
mod commander;
pub mod responses;
mod table;

pub use crate::commands::commander::Commander;

/// Runtime context for command execution.
///
/// Built by the bot for each message it dispatches.
///
/// # Examples
///
/// ```
/// let context = CommandContext {
///     bot_name: "safehouse".to_string(),
///     clock: UptimeClock::start(),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Name of the bot, as shown in the ping reply
    pub bot_name: String,
    /// Clock started with the bot session
    pub clock: UptimeClock,
}

/// Result of command execution.
///
/// Command handlers don't act on the process themselves. A shutdown is
/// requested through `shutdown` and carried out by the caller after the
/// response has been sent.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandResult {
    /// Text to send back, empty when the command produces no reply
    pub response: String,
    /// Whether the caller should schedule the process termination
    pub shutdown: bool,
}

impl CommandResult {
    /// A plain reply with no side effect.
    pub fn reply(response: String) -> Self {
        CommandResult {
            response,
            shutdown: false,
        }
    }

    /// A result with no reply and no side effect.
    pub fn silent() -> Self {
        Self::reply(String::new())
    }
}
