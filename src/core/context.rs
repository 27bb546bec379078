use crate::config::DashboardConfig;
use crate::connections::backend::LinkBackend;
use crate::connections::ports::SystemPorts;

use super::connection_manager::ConnectionManager;
use super::shutdown::ShutdownGuard;

/// Application-scoped state, built once at startup and passed by reference to
/// every consumer (CLI commands, UI tabs).
pub struct AppContext {
    config: DashboardConfig,
    manager: ConnectionManager,
}

impl AppContext {
    /// Build a context whose manager opens real serial ports and sockets.
    pub fn new(config: DashboardConfig) -> Self {
        let manager = ConnectionManager::new(
            Box::new(LinkBackend::new(config.serial_baud)),
            Box::new(SystemPorts),
        );
        Self::with_manager(config, manager)
    }

    pub fn with_manager(config: DashboardConfig, manager: ConnectionManager) -> Self {
        Self { config, manager }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn manager(&self) -> &ConnectionManager {
        &self.manager
    }

    /// Guard that disconnects when dropped; hold it for the life of `main`.
    pub fn shutdown_guard(&self) -> ShutdownGuard {
        ShutdownGuard::new(self.manager.clone())
    }
}
