//! Process termination hook.
//!
//! The `exit` command does not stop the bot directly: once its grace period is
//! over, the bot asks a [`Terminator`] to end the process. In production this is
//! [`SignalTerminator`], which sends SIGTERM to the current process so the
//! signal listener in `main` stops the session.

use log::{error, info};
use mockall::automock;
use nix::{
    sys::signal::{Signal, kill},
    unistd::Pid,
};

/// Ends the running process.
#[automock]
pub trait Terminator {
    /// Requests the process termination. Must not block.
    fn terminate(&self);
}

/// Terminates the process by sending SIGTERM to itself.
pub struct SignalTerminator;

impl Terminator for SignalTerminator {
    fn terminate(&self) {
        let pid = Pid::this();
        info!("sending SIGTERM to process {}", pid);

        if let Err(e) = kill(pid, Signal::SIGTERM) {
            error!("failed to signal process {}: {}", pid, e);
        }
    }
}
