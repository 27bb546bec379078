pub mod errors;
pub mod format;
pub mod messaging;
pub mod nodes;
pub mod owner;

pub use errors::MeshError;
pub use messaging::{send_message, send_to_channel};
pub use nodes::{list_nodes, node_info, MyNodeInfo, NodeSummary};
pub use owner::set_owner;
