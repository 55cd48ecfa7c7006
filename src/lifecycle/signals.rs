//! OS signal handling.
//!
//! SIGTERM and SIGINT are translated into a [`Shutdown`] trigger; the
//! supervisor forwards them to the proxy.

use std::io;

use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinHandle;

use crate::lifecycle::shutdown::Shutdown;

/// Wait for the first SIGTERM or SIGINT, returning its name.
pub async fn wait_for_termination() -> io::Result<&'static str> {
    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = terminate.recv() => Ok("SIGTERM"),
        _ = interrupt.recv() => Ok("SIGINT"),
    }
}

/// Spawn a task that triggers `shutdown` on the first termination signal.
pub fn spawn_listener(shutdown: Shutdown) -> JoinHandle<()> {
    tokio::spawn(async move {
        match wait_for_termination().await {
            Ok(name) => {
                tracing::info!(signal = name, "Termination signal received");
                shutdown.trigger(name);
            }
            Err(e) => tracing::error!(error = %e, "Failed to install signal handlers"),
        }
    })
}

/// Send SIGTERM to a child process.
pub fn terminate(pid: u32) -> io::Result<()> {
    let pid = libc::pid_t::try_from(pid)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // SAFETY: kill(2) has no memory-safety preconditions.
    let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}
