//! # brainhost-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DeviceLoader`: produce the device collection
//!   - `BrainDiscovery`: find one brain on the network
//!   - `DeviceServer`: start and stop the server exposing devices
//! - Define **driving/inbound ports** as use-case structs:
//!   - `BrainResolver`: explicit host, environment override, or discovery
//!   - `Orchestrator`: start/stop the device server
//! - Orchestrate domain objects without knowing *how* discovery or serving works
//!
//! ## Dependency rule
//! Depends on `brainhost-domain` only (plus `tokio` for joining futures).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
