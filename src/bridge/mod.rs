//! Bridge core
//!
//! Wires configuration, the credential backend, the passive-address
//! resolver, and the publisher into the object the protocol engine drives.

pub mod core;

pub use core::Bridge;
