//! Ping command handler.

use log::debug;

use crate::{
    commands::{CommandContext, CommandResult, responses::format_uptime},
    uptime::format_duration,
};

/// Reports that the bot is alive and for how long it has been running.
pub fn handle_ping(context: &CommandContext) -> CommandResult {
    debug!("handling ping command");

    let elapsed = format_duration(context.clock.elapsed());
    CommandResult::reply(format_uptime(&context.bot_name, &elapsed))
}
