//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod device_loader;
pub mod discovery;
pub mod server;

pub use device_loader::DeviceLoader;
pub use discovery::BrainDiscovery;
pub use server::DeviceServer;
