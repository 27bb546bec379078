pub mod config;
pub mod connections;
pub mod core;
pub mod mesh;
pub mod storage;
pub mod ui;
pub mod utils;

// re-export ergonomic entry points
pub use crate::core::connection_manager::{ConnectionManager, ConnectionStatus};
pub use crate::core::context::AppContext;
pub use crate::core::errors::ConnectionError;
