//! kafkatp - FTP front door for Kafka
//!
//! Every file uploaded over FTP becomes one message on a Kafka topic
//! instead of a file on disk. This crate is the integration core: the
//! protocol engine plugs in through the [`vfs::VirtualFs`] capability
//! contract and the [`Bridge::login`] hook, the bootstrap layer hands in a
//! fully-populated [`BridgeConfig`], and Kafka and the optional LDAP
//! directory sit behind their own seams.

pub mod auth;
pub mod bridge;
pub mod config;
pub mod error;
pub mod net;
pub mod publish;
pub mod vfs;

pub use bridge::Bridge;
pub use config::BridgeConfig;
