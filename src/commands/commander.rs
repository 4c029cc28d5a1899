//! Command orchestration and execution.
//!
//! This module provides the [`Commander`] struct, the entry point for
//! processing the text users address to the bot.
//!
//! # Flow
//!
//! ```text
//! mention text → CommandInvocation::parse() → Command::parse() → action → CommandResult
//! ```
//!
//! # Examples
//!
//! ```no_run
//! let commander = Commander::new();
//! let context = CommandContext {
//!     bot_name: "safehouse".to_string(),
//!     clock: UptimeClock::start(),
//! };
//!
//! let result = commander.handle("ping", &context);
//! println!("Bot response: {}", result.response);
//! ```

use log::{error, info, warn};

use crate::commands::{
    CommandContext, CommandResult,
    actions::{handle_exit, handle_filter, handle_help, handle_ping},
    command::{Command, CommandInvocation, CommandParsingError, format_command_error},
    table::CommandTable,
};

/// Command dispatcher.
///
/// The Commander owns the [`CommandTable`], built once when the bot starts,
/// and turns raw command text into a [`CommandResult`].
///
/// # Supported Commands
///
/// - `help` - Display the command table
/// - `ping` - Report the uptime
/// - `exit`, `quit` - Shut the bot down
/// - `list`, `add`, `del`, `clear`, `raise` - Accepted, no reply
pub struct Commander {
    /// Registered commands and their descriptions
    table: CommandTable,
}

impl Default for Commander {
    fn default() -> Self {
        Self::new()
    }
}

impl Commander {
    /// Creates a new Commander with the default command table.
    pub fn new() -> Self {
        Commander {
            table: CommandTable::default(),
        }
    }

    /// Parses and executes a command.
    ///
    /// The result is always displayable: tokenizing failures and unknown
    /// commands come back as a reply explaining the problem. An empty
    /// `response` means nothing should be sent.
    ///
    /// # Arguments
    ///
    /// * `body` - The text following the bot mention
    /// * `context` - Bot name and uptime clock
    pub fn handle(&self, body: &str, context: &CommandContext) -> CommandResult {
        info!("received command: {}", body);

        let invocation = match CommandInvocation::parse(body) {
            Ok(invocation) => invocation,
            Err(e) => {
                warn!("unable to parse command {:?}: {:?}", body, e);
                return CommandResult::reply(format_command_error(&e));
            }
        };

        let command = match Command::parse(&self.table, &invocation) {
            Ok(command) => command,
            Err(e) => {
                if let CommandParsingError::Unknown(name) = &e {
                    error!("unknown command: {}", name);
                }
                return CommandResult::reply(format_command_error(&e));
            }
        };

        self.execute(command, &invocation.args, context)
    }

    /// Routes a parsed command to its handler.
    fn execute(&self, command: Command, args: &[String], context: &CommandContext) -> CommandResult {
        match command {
            Command::Help => handle_help(&self.table),
            Command::Ping => handle_ping(context),
            Command::Exit => handle_exit(),
            Command::List | Command::Add | Command::Del | Command::Clear | Command::Raise => {
                handle_filter(command, args)
            }
        }
    }
}
