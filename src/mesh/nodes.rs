use log::{debug, warn};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::connection_manager::ConnectionManager;

use super::errors::MeshError;

const UNKNOWN: &str = "Unknown";

/// One row of the node table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSummary {
    pub num: u32,
    pub long_name: String,
    pub short_name: String,
    pub mac: String,
}

/// Sections describing the locally attached node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MyNodeInfo {
    pub num: Option<u64>,
    pub is_favorite: Option<bool>,
    pub user: Map<String, Value>,
    pub position: Map<String, Value>,
    pub metrics: Map<String, Value>,
}

/// Node table of the connected radio, in node-number order.
///
/// Entries that are not objects are skipped with a warning.
pub fn list_nodes(manager: &ConnectionManager) -> Result<Vec<NodeSummary>, MeshError> {
    let table = manager.with_device(|device| device.node_table())?;
    debug!("Device reported {} node(s)", table.len());

    let mut nodes = Vec::with_capacity(table.len());
    for (num, node) in table {
        match summarize(num, &node) {
            Some(summary) => nodes.push(summary),
            None => warn!("Skipping node {}: expected an object, got {}", num, node),
        }
    }
    Ok(nodes)
}

fn summarize(num: u32, node: &Value) -> Option<NodeSummary> {
    let node = node.as_object()?;
    let user = node.get("user").and_then(Value::as_object);
    let field = |key: &str| {
        user.and_then(|u| u.get(key))
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN)
            .to_owned()
    };
    Some(NodeSummary {
        num,
        long_name: field("longName"),
        short_name: field("shortName"),
        mac: field("macaddr"),
    })
}

/// Information about the radio the dashboard is attached to.
pub fn node_info(manager: &ConnectionManager) -> Result<MyNodeInfo, MeshError> {
    let raw = manager.with_device(|device| device.my_node_info())?;
    let info = raw.as_object().ok_or_else(|| MeshError::UnexpectedFormat {
        what: "node info",
        detail: raw.to_string(),
    })?;

    let section = |key: &str| {
        info.get(key)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    };
    Ok(MyNodeInfo {
        num: info.get("num").and_then(Value::as_u64),
        is_favorite: info.get("isFavorite").and_then(Value::as_bool),
        user: section("user"),
        position: section("position"),
        metrics: section("deviceMetrics"),
    })
}
