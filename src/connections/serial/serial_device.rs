use log::{debug, info};
use serialport::SerialPort;
use std::time::Duration;

use crate::connections::device::{ConnectionKind, DeviceInterface};
use crate::connections::errors::DeviceError;

/// A mesh radio attached to a local serial port.
pub struct SerialDevice {
    port_path: String,
    inner: Option<Box<dyn SerialPort>>,
}

impl SerialDevice {
    /// Open `port_path` at `baud_rate`.
    pub fn open(port_path: &str, baud_rate: u32) -> Result<Self, DeviceError> {
        info!("Attempting to open serial port: {} at {} baud", port_path, baud_rate);

        let serial_port = serialport::new(port_path, baud_rate)
            .timeout(Duration::from_millis(1000))
            .open()?;

        info!("Successfully opened serial port: {}", port_path);

        Ok(SerialDevice {
            port_path: port_path.to_owned(),
            inner: Some(serial_port),
        })
    }
}

impl DeviceInterface for SerialDevice {
    fn kind(&self) -> ConnectionKind {
        ConnectionKind::Serial
    }

    fn reported_address(&self) -> String {
        // The OS may resolve the requested path to a different device name.
        self.inner
            .as_ref()
            .and_then(|port| port.name())
            .unwrap_or_else(|| self.port_path.clone())
    }

    fn close(&mut self) -> Result<(), DeviceError> {
        match self.inner.take() {
            Some(port) => {
                info!("Closing serial port: {}", self.port_path);
                drop(port);
            }
            None => debug!("Serial port {} already closed", self.port_path),
        }
        Ok(())
    }
}
