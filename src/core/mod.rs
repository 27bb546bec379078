pub mod connection_manager;
pub mod context;
pub mod errors;
pub mod observers;
pub mod shutdown;

// Re-export the modules here for easy import elsewhere.
pub use connection_manager::*;
pub use context::*;
pub use errors::*;
pub use observers::*;
pub use shutdown::*;
