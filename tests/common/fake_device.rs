//! A deterministic **in-process stand-in** for the device library.
//!
//! * `FakeBackend` opens `FakeDevice`s without touching a serial port or socket.
//! * `FakeLog` is shared with the test and records every open, close, message
//!   and owner change so assertions can inspect what the manager did.
//! * `FakePorts` returns a fixed port list (or a scan failure).

use meshdash::connections::{
    ConnectionKind, DeviceBackend, DeviceError, DeviceInterface, Destination, PortEnumerator,
    PortInfo,
};
use meshdash::ConnectionManager;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// How the fake devices behave.
#[derive(Default, Clone)]
pub struct FakeConfig {
    /// Serial paths that fail to open.
    pub missing_paths: Vec<String>,
    /// Hosts that refuse connections.
    pub unreachable_hosts: Vec<String>,
    /// Requested path -> path the OS actually binds.
    pub aliases: HashMap<String, String>,
    /// Simulated open latency.
    pub open_delay: Duration,
    pub fail_close: bool,
    pub panic_on_close: bool,
    pub nodes: BTreeMap<u32, Value>,
    pub my_node: Value,
}

#[derive(Default)]
pub struct FakeLog {
    pub serial_opens: AtomicUsize,
    pub network_opens: AtomicUsize,
    pub closes: AtomicUsize,
    pub opened_paths: Mutex<Vec<String>>,
    pub sent: Mutex<Vec<(String, Destination)>>,
    pub owner: Mutex<Option<(String, String)>>,
}

impl FakeLog {
    pub fn opens(&self) -> usize {
        self.serial_opens.load(Ordering::SeqCst) + self.network_opens.load(Ordering::SeqCst)
    }
}

pub struct FakeBackend {
    config: FakeConfig,
    log: Arc<FakeLog>,
}

impl FakeBackend {
    pub fn new(config: FakeConfig) -> (Self, Arc<FakeLog>) {
        let log = Arc::new(FakeLog::default());
        (
            Self {
                config,
                log: Arc::clone(&log),
            },
            log,
        )
    }
}

impl DeviceBackend for FakeBackend {
    fn open_serial(&self, path: &str) -> Result<Box<dyn DeviceInterface>, DeviceError> {
        self.log.serial_opens.fetch_add(1, Ordering::SeqCst);
        thread::sleep(self.config.open_delay);
        if self.config.missing_paths.iter().any(|p| p == path) {
            return Err(DeviceError::IoError(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path),
            )));
        }
        self.log.opened_paths.lock().unwrap().push(path.to_owned());
        let bound = self
            .config
            .aliases
            .get(path)
            .cloned()
            .unwrap_or_else(|| path.to_owned());
        Ok(Box::new(FakeDevice::new(
            ConnectionKind::Serial,
            bound,
            &self.config,
            &self.log,
        )))
    }

    fn open_network(&self, host: &str, port: u16) -> Result<Box<dyn DeviceInterface>, DeviceError> {
        self.log.network_opens.fetch_add(1, Ordering::SeqCst);
        thread::sleep(self.config.open_delay);
        if self.config.unreachable_hosts.iter().any(|h| h == host) {
            return Err(DeviceError::IoError(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }
        Ok(Box::new(FakeDevice::new(
            ConnectionKind::Network,
            format!("{}:{}", host, port),
            &self.config,
            &self.log,
        )))
    }
}

pub struct FakeDevice {
    kind: ConnectionKind,
    address: String,
    fail_close: bool,
    panic_on_close: bool,
    nodes: BTreeMap<u32, Value>,
    my_node: Value,
    log: Arc<FakeLog>,
}

impl FakeDevice {
    fn new(kind: ConnectionKind, address: String, config: &FakeConfig, log: &Arc<FakeLog>) -> Self {
        Self {
            kind,
            address,
            fail_close: config.fail_close,
            panic_on_close: config.panic_on_close,
            nodes: config.nodes.clone(),
            my_node: config.my_node.clone(),
            log: Arc::clone(log),
        }
    }
}

impl DeviceInterface for FakeDevice {
    fn kind(&self) -> ConnectionKind {
        self.kind
    }

    fn reported_address(&self) -> String {
        self.address.clone()
    }

    fn close(&mut self) -> Result<(), DeviceError> {
        self.log.closes.fetch_add(1, Ordering::SeqCst);
        if self.panic_on_close {
            panic!("driver crashed while closing {}", self.address);
        }
        if self.fail_close {
            return Err(DeviceError::Other("device stuck".into()));
        }
        Ok(())
    }

    fn node_table(&self) -> Result<BTreeMap<u32, Value>, DeviceError> {
        Ok(self.nodes.clone())
    }

    fn my_node_info(&self) -> Result<Value, DeviceError> {
        Ok(self.my_node.clone())
    }

    fn send_text(&mut self, text: &str, destination: Destination) -> Result<(), DeviceError> {
        self.log
            .sent
            .lock()
            .unwrap()
            .push((text.to_owned(), destination));
        Ok(())
    }

    fn set_owner(&mut self, long_name: &str, short_name: &str) -> Result<(), DeviceError> {
        *self.log.owner.lock().unwrap() = Some((long_name.to_owned(), short_name.to_owned()));
        Ok(())
    }
}

/// Fixed port list; `None` simulates a failing OS enumeration.
pub struct FakePorts(pub Option<Vec<PortInfo>>);

impl PortEnumerator for FakePorts {
    fn list_ports(&self) -> Result<Vec<PortInfo>, DeviceError> {
        self.0
            .clone()
            .ok_or_else(|| DeviceError::PortError("enumeration unavailable".into()))
    }
}

pub fn port(path: &str) -> PortInfo {
    PortInfo {
        device_path: path.to_owned(),
        description: "CP2102 USB to UART Bridge Controller".to_owned(),
        hardware_id: "USB VID:PID=10C4:EA60".to_owned(),
    }
}

/// Manager over a fake backend with the given serial ports.
pub fn fake_manager(config: FakeConfig, ports: &[&str]) -> (ConnectionManager, Arc<FakeLog>) {
    let (backend, log) = FakeBackend::new(config);
    let ports = FakePorts(Some(ports.iter().map(|p| port(p)).collect()));
    (ConnectionManager::new(Box::new(backend), Box::new(ports)), log)
}
