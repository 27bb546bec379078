use log::{debug, info, warn};
use std::panic::{self, AssertUnwindSafe};

use super::connection_manager::ConnectionManager;

/// Best-effort disconnect when the application exits.
///
/// Failures, including panics from observers, are swallowed; shutdown never
/// changes the exit status.
pub fn shutdown(manager: &ConnectionManager) {
    let result = panic::catch_unwind(AssertUnwindSafe(|| manager.disconnect()));
    match result {
        Ok(true) => info!("Mesh radio connection closed."),
        Ok(false) => debug!("Nothing to close at shutdown"),
        Err(_) => warn!("Disconnect at shutdown panicked; ignoring"),
    }
}

/// Runs [`shutdown`] when dropped.
pub struct ShutdownGuard {
    manager: Option<ConnectionManager>,
}

impl ShutdownGuard {
    pub fn new(manager: ConnectionManager) -> Self {
        Self {
            manager: Some(manager),
        }
    }

    /// Skip the disconnect, e.g. when the connection was handed elsewhere.
    pub fn disarm(mut self) {
        self.manager = None;
    }
}

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        if let Some(manager) = self.manager.take() {
            shutdown(&manager);
        }
    }
}

/// Disconnect on Ctrl+C, then exit with the conventional SIGINT status.
pub fn install_interrupt_handler(manager: ConnectionManager) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        info!("Interrupted; closing connection");
        shutdown(&manager);
        std::process::exit(130);
    })
}
