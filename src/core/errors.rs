use thiserror::Error;

use crate::connections::errors::DeviceError;

/// Errors surfaced by the connection manager to its immediate caller.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Already connected to {address}. Disconnect first.")]
    AlreadyConnected { address: String },
    #[error("No serial ports found.")]
    NoPortsFound,
    #[error("Connection to {target} failed: {source}")]
    ConnectionFailed {
        target: String,
        #[source]
        source: DeviceError,
    },
    #[error("Not connected.")]
    NotConnected,
    #[error("Serial port scan failed: {0}")]
    PortScan(#[source] DeviceError),
    #[error(transparent)]
    Device(#[from] DeviceError),
}
