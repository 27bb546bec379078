pub mod backend;
pub mod device;
pub mod errors;
pub mod network;
pub mod ports;
pub mod serial;

// Re-export the modules here for easy import elsewhere.
pub use backend::*;
pub use device::*;
pub use errors::*;
pub use ports::*;
