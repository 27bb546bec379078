use serde::{Deserialize, Serialize};

use crate::connections::device::ConnectTarget;

/// A user-named connection preset.
///
/// The enum is `#[serde(tag = "kind")]` so JSON looks like:
/// `{ "name":"base", "kind":"Network", "host":"10.0.0.5", "port":4403 }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Profile {
    Serial {
        name: String,
        /// `None` picks the first port found at connect time.
        #[serde(default)]
        port: Option<String>,
    },
    Network {
        name: String,
        host: String,
        port: u16,
    },
}

impl Profile {
    /// Returns the unique, human-readable identifier.
    pub fn name(&self) -> &str {
        match self {
            Profile::Serial { name, .. } => name,
            Profile::Network { name, .. } => name,
        }
    }

    pub fn target(&self) -> ConnectTarget {
        match self {
            Profile::Serial { port, .. } => ConnectTarget::Serial { path: port.clone() },
            Profile::Network { host, port, .. } => ConnectTarget::Network {
                host: host.clone(),
                port: *port,
            },
        }
    }
}
