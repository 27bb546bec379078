use log::debug;
use serialport::{SerialPortInfo, SerialPortType};

use super::errors::DeviceError;

/// One entry of a serial port scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub device_path: String,
    pub description: String,
    pub hardware_id: String,
}

/// Source of the serial ports visible to the operating system.
pub trait PortEnumerator: Send + Sync {
    fn list_ports(&self) -> Result<Vec<PortInfo>, DeviceError>;
}

/// Enumerates ports through `serialport::available_ports`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPorts;

impl PortEnumerator for SystemPorts {
    fn list_ports(&self) -> Result<Vec<PortInfo>, DeviceError> {
        let ports = serialport::available_ports()?;
        debug!("Serial scan found {} port(s)", ports.len());
        Ok(ports.into_iter().map(port_info).collect())
    }
}

fn port_info(port: SerialPortInfo) -> PortInfo {
    let (description, hardware_id) = match &port.port_type {
        SerialPortType::UsbPort(usb) => (
            usb_description(usb.product.as_deref(), usb.manufacturer.as_deref()),
            usb_hardware_id(usb.vid, usb.pid, usb.serial_number.as_deref()),
        ),
        SerialPortType::PciPort => ("PCI serial port".to_owned(), "PCI".to_owned()),
        SerialPortType::BluetoothPort => ("Bluetooth serial port".to_owned(), "n/a".to_owned()),
        SerialPortType::Unknown => ("n/a".to_owned(), "n/a".to_owned()),
    };
    PortInfo {
        device_path: port.port_name,
        description,
        hardware_id,
    }
}

fn usb_description(product: Option<&str>, manufacturer: Option<&str>) -> String {
    product
        .or(manufacturer)
        .filter(|s| !s.is_empty())
        .unwrap_or("n/a")
        .to_owned()
}

fn usb_hardware_id(vid: u16, pid: u16, serial_number: Option<&str>) -> String {
    match serial_number {
        Some(serial) if !serial.is_empty() => {
            format!("USB VID:PID={:04X}:{:04X} SER={}", vid, pid, serial)
        }
        _ => format!("USB VID:PID={:04X}:{:04X}", vid, pid),
    }
}
