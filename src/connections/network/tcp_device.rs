use log::{debug, info};
use std::net::{Shutdown, TcpStream};

use crate::connections::device::{ConnectionKind, DeviceInterface};
use crate::connections::errors::DeviceError;

/// A mesh radio reachable over TCP.
pub struct TcpDevice {
    host: String,
    port: u16,
    stream: Option<TcpStream>,
}

impl TcpDevice {
    pub fn open(host: &str, port: u16) -> Result<Self, DeviceError> {
        info!("Connecting to mesh radio at {}:{}", host, port);
        let stream = TcpStream::connect((host, port))?;
        stream.set_nodelay(true)?;
        info!("TCP connection established to {}:{}", host, port);

        Ok(TcpDevice {
            host: host.to_owned(),
            port,
            stream: Some(stream),
        })
    }
}

impl DeviceInterface for TcpDevice {
    fn kind(&self) -> ConnectionKind {
        ConnectionKind::Network
    }

    fn reported_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn close(&mut self) -> Result<(), DeviceError> {
        match self.stream.take() {
            Some(stream) => {
                info!("Closing TCP connection to {}:{}", self.host, self.port);
                stream.shutdown(Shutdown::Both)?;
            }
            None => debug!("TCP connection to {}:{} already closed", self.host, self.port),
        }
        Ok(())
    }
}
