//! Error handling
//!
//! Defines error types and handling for the bridge core.

pub mod types;

pub use types::*;
