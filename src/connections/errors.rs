use thiserror::Error;

/// A central error enum for device-level errors.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Port error: {0}")]
    PortError(String),
    #[error("{0} is not supported by this device link")]
    Unsupported(&'static str),
    #[error("Device rejected request: {0}")]
    Rejected(String),
    #[error("Other error: {0}")]
    Other(String),
}

/// Convert from serialport::Error.
/// Without this, `map_err(DeviceError::from)` won't work when using `serialport`.
impl From<serialport::Error> for DeviceError {
    fn from(err: serialport::Error) -> Self {
        DeviceError::PortError(err.to_string())
    }
}
