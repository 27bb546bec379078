use log::{debug, error, info, warn};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, OnceLock, PoisonError, RwLock};

use crate::connections::backend::LinkBackend;
use crate::connections::device::{ConnectTarget, ConnectionKind, DeviceBackend, DeviceInterface};
use crate::connections::errors::DeviceError;
use crate::connections::ports::{PortEnumerator, PortInfo, SystemPorts};

use super::errors::ConnectionError;
use super::observers::{ConnectionEvent, ConnectionObserver, ObserverRegistry};

/// What the manager is currently connected to.
///
/// `kind == None` exactly when `address` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionStatus {
    pub kind: ConnectionKind,
    pub address: Option<String>,
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        self.kind != ConnectionKind::None
    }
}

type DeviceSlot = Option<Box<dyn DeviceInterface>>;

/// Owns the single active device connection of the application.
///
/// Cloning is cheap and every clone refers to the same connection, so the
/// manager can be handed to each UI surface or worker thread that needs it.
///
/// `connect` and `disconnect` hold the lifecycle lock across the device
/// open/close call, which may block on I/O for seconds. Call them from a
/// worker thread, not from an event-dispatch thread.
#[derive(Clone)]
pub struct ConnectionManager {
    inner: Arc<Inner>,
}

struct Inner {
    /// Lifecycle lock; held for the full duration of connect/disconnect.
    device: Mutex<DeviceSlot>,
    /// Snapshot for readers that must not wait on device I/O.
    status: RwLock<ConnectionStatus>,
    observers: ObserverRegistry,
    rounds: NotifySequencer,
    backend: Box<dyn DeviceBackend>,
    ports: Box<dyn PortEnumerator>,
}

static GLOBAL: OnceLock<ConnectionManager> = OnceLock::new();

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new(Box::new(LinkBackend::default()), Box::new(SystemPorts))
    }
}

impl ConnectionManager {
    pub fn new(backend: Box<dyn DeviceBackend>, ports: Box<dyn PortEnumerator>) -> Self {
        Self {
            inner: Arc::new(Inner {
                device: Mutex::new(None),
                status: RwLock::new(ConnectionStatus::default()),
                observers: ObserverRegistry::new(),
                rounds: NotifySequencer::default(),
                backend,
                ports,
            }),
        }
    }

    /// The process-wide manager, created with the default link backend on
    /// first use. Prefer passing an [`AppContext`](super::context::AppContext)
    /// around; this exists for collaborators that cannot be handed one.
    pub fn global() -> &'static ConnectionManager {
        GLOBAL.get_or_init(|| {
            debug!("Creating process-wide connection manager");
            ConnectionManager::default()
        })
    }

    /// True if both values refer to the same underlying manager.
    pub fn same_instance(&self, other: &ConnectionManager) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Subscribe to connect/disconnect transitions. Registering the same
    /// handle again is a no-op.
    pub fn on_connection_changed(&self, handler: ConnectionObserver) {
        self.inner.observers.register(handler);
    }

    /// Wraps `handler` and registers it, returning the handle so the caller
    /// can refer to the same observer later.
    pub fn register_observer<F>(&self, handler: F) -> ConnectionObserver
    where
        F: Fn(&ConnectionEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let handle: ConnectionObserver = Arc::new(handler);
        self.on_connection_changed(Arc::clone(&handle));
        handle
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observers.len()
    }

    /// Open a connection to `target`.
    ///
    /// Fails with [`ConnectionError::AlreadyConnected`] if a device is live;
    /// the caller has to disconnect explicitly first. Observers are notified
    /// of both successful and failed attempts.
    pub fn connect(&self, target: ConnectTarget) -> Result<ConnectionStatus, ConnectionError> {
        let mut device = self.lock_device();

        if device.is_some() {
            let address = self.status().address.unwrap_or_default();
            warn!("Refusing to connect to {}: already connected to {}", target, address);
            return Err(ConnectionError::AlreadyConnected { address });
        }

        let result = self.open(&target).map(|handle| {
            let status = ConnectionStatus {
                kind: handle.kind(),
                address: Some(handle.reported_address()),
            };
            *device = Some(handle);
            self.set_status(status.clone());
            status
        });

        let event = match &result {
            Ok(status) => {
                info!(
                    "Connected via {} to {}",
                    status.kind,
                    status.address.as_deref().unwrap_or_default()
                );
                ConnectionEvent::Connected(status.clone())
            }
            Err(e) => {
                error!("Connection to {} failed: {}", target, e);
                ConnectionEvent::ConnectFailed {
                    target: target.to_string(),
                    reason: e.to_string(),
                }
            }
        };

        self.notify_after(device, &event);
        result
    }

    /// Close the active connection, if any.
    ///
    /// Always succeeds: the status is cleared first, then close errors and
    /// panics are logged and the handle is forgotten regardless. Observers are notified even when nothing was connected.
    /// Returns whether a device was released.
    pub fn disconnect(&self) -> bool {
        let mut device = self.lock_device();
        let previous = self.status().address;

        let released = match device.take() {
            Some(mut handle) => {
                self.set_status(ConnectionStatus::default());
                let address = previous.as_deref().unwrap_or_default();
                match panic::catch_unwind(AssertUnwindSafe(|| handle.close())) {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => warn!("Ignoring error while closing {}: {}", address, e),
                    Err(_) => error!("Device close panicked for {}; handle dropped", address),
                }
                info!("Disconnected from {}", address);
                true
            }
            None => {
                debug!("Disconnect requested while not connected");
                false
            }
        };

        self.notify_after(device, &ConnectionEvent::Disconnected { previous });
        released
    }

    /// Run `f` against the live device while holding the lifecycle lock.
    pub fn with_device<R, F>(&self, f: F) -> Result<R, ConnectionError>
    where
        F: FnOnce(&mut dyn DeviceInterface) -> Result<R, DeviceError>,
    {
        let mut device = self.lock_device();
        match device.as_mut() {
            Some(handle) => f(&mut **handle).map_err(ConnectionError::from),
            None => Err(ConnectionError::NotConnected),
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.inner
            .status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_connected(&self) -> bool {
        self.status().is_connected()
    }

    pub fn connected_address(&self) -> Option<String> {
        self.status().address
    }

    pub fn connection_kind(&self) -> ConnectionKind {
        self.status().kind
    }

    /// Serial ports currently visible to the OS. Does not touch the
    /// connection state.
    pub fn scan_serial_ports(&self) -> Result<Vec<PortInfo>, ConnectionError> {
        self.inner
            .ports
            .list_ports()
            .map_err(ConnectionError::PortScan)
    }

    fn open(&self, target: &ConnectTarget) -> Result<Box<dyn DeviceInterface>, ConnectionError> {
        match target {
            ConnectTarget::Serial { path: Some(path) } => self
                .inner
                .backend
                .open_serial(path)
                .map_err(|source| ConnectionError::ConnectionFailed {
                    target: path.clone(),
                    source,
                }),
            ConnectTarget::Serial { path: None } => {
                let ports = self.scan_serial_ports()?;
                let first = ports.first().ok_or(ConnectionError::NoPortsFound)?;
                debug!("Auto-selected serial port {}", first.device_path);
                self.inner
                    .backend
                    .open_serial(&first.device_path)
                    .map_err(|source| ConnectionError::ConnectionFailed {
                        target: first.device_path.clone(),
                        source,
                    })
            }
            ConnectTarget::Network { host, port } => self
                .inner
                .backend
                .open_network(host, *port)
                .map_err(|source| ConnectionError::ConnectionFailed {
                    target: target.to_string(),
                    source,
                }),
        }
    }

    /// Release the lifecycle lock and run the observers for `event`.
    ///
    /// The turn is claimed before the lock is dropped, so notification rounds
    /// run in the order their transitions were committed and never overlap.
    fn notify_after(&self, device: MutexGuard<'_, DeviceSlot>, event: &ConnectionEvent) {
        let ticket = self.inner.rounds.take_ticket();
        drop(device);

        let _turn = self.inner.rounds.wait_turn(ticket);
        let failures = self.inner.observers.notify(event);
        if failures > 0 {
            warn!("{} connection observer(s) failed for {:?}", failures, event);
        }
    }

    fn lock_device(&self) -> MutexGuard<'_, DeviceSlot> {
        self.inner
            .device
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn set_status(&self, status: ConnectionStatus) {
        *self
            .inner
            .status
            .write()
            .unwrap_or_else(PoisonError::into_inner) = status;
    }
}

/// Hands out notification turns in commit order.
#[derive(Default)]
struct NotifySequencer {
    turns: Mutex<Turns>,
    advanced: Condvar,
}

#[derive(Default)]
struct Turns {
    issued: u64,
    serving: u64,
}

impl NotifySequencer {
    fn take_ticket(&self) -> u64 {
        let mut turns = self.turns.lock().unwrap_or_else(PoisonError::into_inner);
        let ticket = turns.issued;
        turns.issued += 1;
        ticket
    }

    fn wait_turn(&self, ticket: u64) -> Turn<'_> {
        let mut turns = self.turns.lock().unwrap_or_else(PoisonError::into_inner);
        while turns.serving != ticket {
            turns = self
                .advanced
                .wait(turns)
                .unwrap_or_else(PoisonError::into_inner);
        }
        Turn { sequencer: self }
    }
}

/// Passes the turn on when dropped.
struct Turn<'a> {
    sequencer: &'a NotifySequencer,
}

impl Drop for Turn<'_> {
    fn drop(&mut self) {
        let mut turns = self
            .sequencer
            .turns
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        turns.serving += 1;
        self.sequencer.advanced.notify_all();
    }
}
