//! Command action handlers.
//!
//! Individual handler functions for each bot command. Each handler returns a
//! [`CommandResult`](crate::commands::CommandResult) holding the reply and, for
//! `exit`, the shutdown request.
//!
//! # Available Handlers
//!
//! - [`handle_help`] - Render the command table
//! - [`handle_ping`] - Report the uptime
//! - [`handle_exit`] - Announce and request the shutdown
//! - [`handle_filter`] - Reserved filter commands, no reply

mod exit;
mod filters;
mod help;
mod ping;

pub use crate::commands::actions::{
    exit::handle_exit, filters::handle_filter, help::handle_help, ping::handle_ping,
};
