// src/exec/signal.rs

//! Termination requests delivered to a supervised child.

use tokio::process::Child;

/// What the owner of a child should do to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Polite request (`SIGTERM` on unix).
    Terminate,
    /// Forced kill (`SIGKILL` on unix).
    Kill,
}

/// Deliver `request` to a child that has not been reaped yet.
///
/// Only the reaper calls this, so the pid cannot have been recycled.
pub(crate) fn deliver(child: &mut Child, request: Termination) -> std::io::Result<()> {
    match request {
        Termination::Kill => child.start_kill(),
        Termination::Terminate => terminate(child),
    }
}

#[cfg(unix)]
fn terminate(child: &mut Child) -> std::io::Result<()> {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    match child.id() {
        Some(pid) => kill(Pid::from_raw(pid as i32), Signal::SIGTERM)
            .map_err(|errno| std::io::Error::from_raw_os_error(errno as i32)),
        None => Ok(()),
    }
}

#[cfg(not(unix))]
fn terminate(child: &mut Child) -> std::io::Result<()> {
    child.start_kill()
}
