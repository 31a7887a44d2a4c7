//! Virtual filesystem
//!
//! The capability contract the protocol engine drives, plus the write-only
//! adapter the bridge binds to a session at login. The engine depends only
//! on the [`VirtualFs`] trait, so alternate backends can be swapped in
//! without touching the engine.

pub mod adapter;
pub mod paths;

pub use adapter::BridgeFs;
pub use paths::{ResolvedPath, unique_name};

use std::time::SystemTime;

use tokio::io::AsyncRead;

use crate::error::VfsError;
use crate::publish::UploadSink;

/// Synthetic metadata for protocol introspection commands. The adapter
/// never queries real storage.
#[derive(Debug, Clone)]
pub struct FileStat {
    pub name: String,
    pub size: u64,
    pub is_dir: bool,
    pub modified: SystemTime,
}

/// Options carried by the protocol's upload command. Accepted for protocol
/// compatibility; every upload is a fresh whole-file write.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    pub append: bool,
    pub start: Option<u64>,
}

/// Filesystem capability contract between the protocol engine and a
/// backend. One operation per client command; path state lives behind the
/// trait, never in the engine.
pub trait VirtualFs: Send {
    /// Resolves a requested path to its client-visible and backing forms.
    fn resolve_path(&self, requested: &str) -> ResolvedPath;

    /// The session's protocol-visible working directory.
    fn current_directory(&self) -> String;

    /// Resolves and adopts a new working directory, returning it.
    fn change_directory(&mut self, requested: &str) -> String;

    /// Metadata for a name resolved within the session root.
    fn stat(&self, name: &str) -> Result<FileStat, VfsError>;

    /// Directory entries under `path`.
    fn list(&self, path: &str) -> Vec<FileStat>;

    /// Opens a byte sink for an upload, returning it with the resolved
    /// client path.
    fn open_write(
        &mut self,
        name: &str,
        options: WriteOptions,
    ) -> Result<(UploadSink, String), VfsError>;

    /// Opens a byte source for a download.
    fn open_read(&self, name: &str) -> Result<Box<dyn AsyncRead + Send + Unpin>, VfsError>;

    fn delete(&mut self, path: &str) -> Result<(), VfsError>;

    fn mkdir(&mut self, path: &str) -> Result<String, VfsError>;

    fn rename(&mut self, from: &str, to: &str) -> Result<(), VfsError>;

    fn chmod(&mut self, path: &str, mode: u32) -> Result<(), VfsError>;

    /// A fresh collision-resistant name for temporary transfers.
    fn unique_name(&self) -> String;
}
