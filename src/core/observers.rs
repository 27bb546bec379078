use log::{debug, error};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

use super::connection_manager::ConnectionStatus;

/// A connection lifecycle transition, as seen by observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Connected(ConnectionStatus),
    ConnectFailed { target: String, reason: String },
    Disconnected { previous: Option<String> },
}

/// Handler invoked after every connect or disconnect.
///
/// Identity is the `Arc` allocation: registering a clone of the same handle
/// twice is a no-op.
pub type ConnectionObserver = Arc<dyn Fn(&ConnectionEvent) -> anyhow::Result<()> + Send + Sync>;

/// Ordered, grow-only list of observers.
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    handlers: Mutex<Vec<ConnectionObserver>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` unless it is already registered. Returns `true` if it
    /// was added.
    pub fn register(&self, handler: ConnectionObserver) -> bool {
        let mut handlers = self.handlers.lock().unwrap_or_else(PoisonError::into_inner);
        if handlers.iter().any(|h| same_handler(h, &handler)) {
            debug!("Observer already registered; ignoring");
            return false;
        }
        handlers.push(handler);
        true
    }

    pub fn len(&self) -> usize {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Runs every handler once, in registration order, on the calling thread.
    ///
    /// A handler that returns an error or panics is logged and skipped; the
    /// rest still run. Returns the number of handlers that failed.
    pub fn notify(&self, event: &ConnectionEvent) -> usize {
        // Snapshot so handlers may register further observers.
        let handlers: Vec<ConnectionObserver> = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut failures = 0;
        for (index, handler) in handlers.iter().enumerate() {
            match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    failures += 1;
                    error!("Connection observer #{} failed: {:#}", index, e);
                }
                Err(payload) => {
                    failures += 1;
                    error!(
                        "Connection observer #{} panicked: {}",
                        index,
                        panic_message(payload.as_ref())
                    );
                }
            }
        }
        failures
    }
}

fn same_handler(a: &ConnectionObserver, b: &ConnectionObserver) -> bool {
    // Compare data pointers only; vtable pointers are not unique.
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
