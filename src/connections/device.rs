use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde_json::Value;

use super::errors::DeviceError;

/// TCP port a mesh radio listens on when no other port is given.
pub const DEFAULT_NETWORK_PORT: u16 = 4403;

/// Which transport the active handle uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionKind {
    #[default]
    None,
    Serial,
    Network,
}

impl Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionKind::None => write!(f, "None"),
            ConnectionKind::Serial => write!(f, "Serial"),
            ConnectionKind::Network => write!(f, "Network"),
        }
    }
}

/// Where to connect.
///
/// A serial target without a path asks the manager to scan the system ports
/// and take the first one it finds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectTarget {
    Serial { path: Option<String> },
    Network { host: String, port: u16 },
}

impl ConnectTarget {
    pub fn serial(path: impl Into<String>) -> Self {
        ConnectTarget::Serial {
            path: Some(path.into()),
        }
    }

    pub fn first_serial() -> Self {
        ConnectTarget::Serial { path: None }
    }

    /// Network target on [`DEFAULT_NETWORK_PORT`].
    pub fn network(host: impl Into<String>) -> Self {
        ConnectTarget::Network {
            host: host.into(),
            port: DEFAULT_NETWORK_PORT,
        }
    }
}

impl Display for ConnectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectTarget::Serial { path: Some(path) } => write!(f, "{}", path),
            ConnectTarget::Serial { path: None } => write!(f, "first available serial port"),
            ConnectTarget::Network { host, port } => write!(f, "{}:{}", host, port),
        }
    }
}

/// Recipient of a text message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Broadcast,
    Node(u32),
}

impl Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Broadcast => write!(f, "broadcast"),
            Destination::Node(num) => write!(f, "node {}", num),
        }
    }
}

/// An open connection to a mesh radio.
///
/// Transport-level methods are required. The protocol-level accessors default
/// to [`DeviceError::Unsupported`] so that a plain link can be managed without
/// speaking the mesh protocol; a protocol-aware library overrides them.
pub trait DeviceInterface: Send {
    fn kind(&self) -> ConnectionKind;

    /// The address the handle is actually bound to: the OS device path for
    /// serial links, `host:port` for network links.
    fn reported_address(&self) -> String;

    fn close(&mut self) -> Result<(), DeviceError>;

    /// Raw node database keyed by node number.
    fn node_table(&self) -> Result<BTreeMap<u32, Value>, DeviceError> {
        Err(DeviceError::Unsupported("node table"))
    }

    /// Raw description of the locally attached node.
    fn my_node_info(&self) -> Result<Value, DeviceError> {
        Err(DeviceError::Unsupported("local node info"))
    }

    fn send_text(&mut self, _text: &str, _destination: Destination) -> Result<(), DeviceError> {
        Err(DeviceError::Unsupported("text messaging"))
    }

    fn set_owner(&mut self, _long_name: &str, _short_name: &str) -> Result<(), DeviceError> {
        Err(DeviceError::Unsupported("owner configuration"))
    }
}

/// Factory for [`DeviceInterface`] handles.
pub trait DeviceBackend: Send + Sync {
    fn open_serial(&self, path: &str) -> Result<Box<dyn DeviceInterface>, DeviceError>;
    fn open_network(&self, host: &str, port: u16) -> Result<Box<dyn DeviceInterface>, DeviceError>;
}
