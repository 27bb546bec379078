pub mod tcp_device;

pub use tcp_device::TcpDevice;
