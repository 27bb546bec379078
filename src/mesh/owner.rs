use crate::core::connection_manager::ConnectionManager;

use super::errors::MeshError;

/// Radios store the owner's long name in 36 bytes.
pub const MAX_LONG_NAME_BYTES: usize = 36;
/// Radios store the owner's short name in 4 bytes.
pub const MAX_SHORT_NAME_BYTES: usize = 4;

/// Update the owner names of the connected radio.
pub fn set_owner(
    manager: &ConnectionManager,
    long_name: &str,
    short_name: &str,
) -> Result<String, MeshError> {
    let long_name = long_name.trim();
    let short_name = short_name.trim();
    validate("long name", long_name, MAX_LONG_NAME_BYTES)?;
    validate("short name", short_name, MAX_SHORT_NAME_BYTES)?;

    manager.with_device(|device| device.set_owner(long_name, short_name))?;
    Ok(format!(
        "Owner info updated to Long Name: {}, Short Name: {}",
        long_name, short_name
    ))
}

fn validate(field: &str, value: &str, max_bytes: usize) -> Result<(), MeshError> {
    if value.is_empty() {
        return Err(MeshError::InvalidOwner(format!("{} must not be empty", field)));
    }
    if value.len() > max_bytes {
        return Err(MeshError::InvalidOwner(format!(
            "{} is {} bytes; the limit is {}",
            field,
            value.len(),
            max_bytes
        )));
    }
    Ok(())
}
