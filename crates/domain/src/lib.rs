//! # brainhost-domain
//!
//! Pure domain model for the brainhost device bootstrapper.
//!
//! ## Responsibilities
//! - Foundational types: error conventions
//! - Define the **Brain** (the hub that devices are exposed to)
//! - Define **Devices** (descriptors loaded from device files or driver packages)
//! - Define the **Server configuration** assembled for a start attempt
//! - Own the defaults (`6336`, `"default"`, `3000`) and invariant enforcement
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;

pub mod brain;
pub mod device;
pub mod server;
