//! Help command handler.
//!
//! Renders the command table, one row per command. This is a stateless command
//! that always returns the same block for a given table.

use log::debug;

use crate::commands::{CommandResult, responses::format_table, table::CommandTable};

/// Returns the command table rendered as a monospace block, without header.
pub fn handle_help(table: &CommandTable) -> CommandResult {
    debug!("handling help command");

    CommandResult::reply(format_table(table.entries(), false))
}
