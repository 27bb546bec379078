use log::info;

use crate::connections::device::Destination;
use crate::core::connection_manager::ConnectionManager;

use super::errors::MeshError;

/// Send `text` to `destination` over the persistent connection.
pub fn send_message(
    manager: &ConnectionManager,
    text: &str,
    destination: Destination,
) -> Result<String, MeshError> {
    manager.with_device(|device| device.send_text(text, destination))?;
    info!("Sent {} byte(s) to {}", text.len(), destination);
    Ok(format!("Message '{}' sent to {}.", text, destination))
}

/// Broadcast `text` on the primary channel.
pub fn send_to_channel(manager: &ConnectionManager, text: &str) -> Result<String, MeshError> {
    manager.with_device(|device| device.send_text(text, Destination::Broadcast))?;
    info!("Broadcast {} byte(s) on the primary channel", text.len());
    Ok("Message sent to primary broadcast channel.".to_owned())
}
