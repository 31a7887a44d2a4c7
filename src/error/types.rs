//! Error types
//!
//! Defines domain-specific error types for each module of the bridge.

use std::fmt;
use std::io;

/// Authentication module errors
#[derive(Debug)]
pub enum AuthError {
    /// Wrong password, unknown user, or a directory-service rejection.
    /// Directory failures collapse into this variant so the client cannot
    /// tell a bad password from an unreachable service.
    InvalidCredentials,
    MalformedInput(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "Invalid username or password"),
            AuthError::MalformedInput(s) => write!(f, "Malformed input: {}", s),
        }
    }
}

impl std::error::Error for AuthError {}

/// Virtual filesystem errors
#[derive(Debug)]
pub enum VfsError {
    /// The operation is not part of the write-only contract.
    Unsupported(&'static str),
    InvalidPath(String),
}

impl fmt::Display for VfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VfsError::Unsupported(op) => write!(f, "Operation not supported: {}", op),
            VfsError::InvalidPath(p) => write!(f, "Invalid path: {}", p),
        }
    }
}

impl std::error::Error for VfsError {}

/// Upload transfer errors
#[derive(Debug)]
pub enum TransferError {
    /// The sink was already sealed or discarded when more data arrived.
    SinkClosed,
    PayloadTooLarge { size: u64, limit: u64 },
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::SinkClosed => write!(f, "Upload sink is closed"),
            TransferError::PayloadTooLarge { size, limit } => {
                write!(f, "Upload of {} bytes exceeds the {} byte limit", size, limit)
            }
        }
    }
}

impl std::error::Error for TransferError {}

/// Publisher errors
#[derive(Debug)]
pub enum PublishError {
    Transport(String),
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::Transport(e) => write!(f, "Bus transport error: {}", e),
        }
    }
}

impl std::error::Error for PublishError {}

/// General bridge error that encompasses all error types
#[derive(Debug)]
pub enum BridgeError {
    Auth(AuthError),
    Vfs(VfsError),
    Transfer(TransferError),
    Publish(PublishError),
    Config(config::ConfigError),
    Kafka(rdkafka::error::KafkaError),
    IoError(io::Error),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Auth(e) => write!(f, "Authentication error: {}", e),
            BridgeError::Vfs(e) => write!(f, "Filesystem error: {}", e),
            BridgeError::Transfer(e) => write!(f, "Transfer error: {}", e),
            BridgeError::Publish(e) => write!(f, "Publish error: {}", e),
            BridgeError::Config(e) => write!(f, "Configuration error: {}", e),
            BridgeError::Kafka(e) => write!(f, "Kafka error: {}", e),
            BridgeError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<AuthError> for BridgeError {
    fn from(error: AuthError) -> Self {
        BridgeError::Auth(error)
    }
}

impl From<VfsError> for BridgeError {
    fn from(error: VfsError) -> Self {
        BridgeError::Vfs(error)
    }
}

impl From<TransferError> for BridgeError {
    fn from(error: TransferError) -> Self {
        BridgeError::Transfer(error)
    }
}

impl From<PublishError> for BridgeError {
    fn from(error: PublishError) -> Self {
        BridgeError::Publish(error)
    }
}

impl From<config::ConfigError> for BridgeError {
    fn from(error: config::ConfigError) -> Self {
        BridgeError::Config(error)
    }
}

impl From<rdkafka::error::KafkaError> for BridgeError {
    fn from(error: rdkafka::error::KafkaError) -> Self {
        BridgeError::Kafka(error)
    }
}

impl From<io::Error> for BridgeError {
    fn from(error: io::Error) -> Self {
        BridgeError::IoError(error)
    }
}
