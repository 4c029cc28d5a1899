//! Exit command handler.
//!
//! Only announces the shutdown. The termination itself is scheduled by the bot
//! once the notice has been sent.

use log::{debug, info};

use crate::commands::{CommandResult, responses::format_shutdown_notice};

/// Returns the shutdown notice and requests the process termination.
pub fn handle_exit() -> CommandResult {
    debug!("handling exit command");
    info!("shutdown requested");

    CommandResult {
        response: format_shutdown_notice(),
        shutdown: true,
    }
}
