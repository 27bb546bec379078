use super::device::{DeviceBackend, DeviceInterface};
use super::errors::DeviceError;
use super::network::TcpDevice;
use super::serial::SerialDevice;

/// Baud rate mesh radios use on their USB serial console.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Opens plain serial and TCP links.
#[derive(Debug, Clone, Copy)]
pub struct LinkBackend {
    baud_rate: u32,
}

impl LinkBackend {
    pub fn new(baud_rate: u32) -> Self {
        Self { baud_rate }
    }
}

impl Default for LinkBackend {
    fn default() -> Self {
        Self::new(DEFAULT_BAUD_RATE)
    }
}

impl DeviceBackend for LinkBackend {
    fn open_serial(&self, path: &str) -> Result<Box<dyn DeviceInterface>, DeviceError> {
        Ok(Box::new(SerialDevice::open(path, self.baud_rate)?))
    }

    fn open_network(&self, host: &str, port: u16) -> Result<Box<dyn DeviceInterface>, DeviceError> {
        Ok(Box::new(TcpDevice::open(host, port)?))
    }
}
