//! Filter command handler.
//!
//! `list`, `add`, `del`, `clear` and `raise` are registered so that `help`
//! lists them and the dispatcher accepts them, but no filter store exists:
//! they produce no reply.

use log::debug;

use crate::commands::{CommandResult, command::Command};

/// Accepts a filter command and its arguments without acting on them.
pub fn handle_filter(command: Command, args: &[String]) -> CommandResult {
    debug!(
        "filter command {:?} has no behavior, ignoring arguments {:?}",
        command, args
    );

    CommandResult::silent()
}
