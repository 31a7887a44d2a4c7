//! Module `adapter`
//!
//! The write-only, flat filesystem bound to one authenticated session.
//! Navigation is pure path arithmetic, listings are deliberately empty,
//! and uploads produce sinks that publish on completion. Nothing here
//! touches real storage.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use log::{debug, info};
use tokio::io::AsyncRead;

use super::paths::{self, ResolvedPath};
use super::{FileStat, VirtualFs, WriteOptions};
use crate::error::VfsError;
use crate::publish::{Publisher, UploadSink};

/// Per-session state: the resolved home root and the protocol-visible
/// working directory. Exactly one per connection, owned by its task.
#[derive(Debug, Clone)]
pub struct Session {
    root: PathBuf,
    cwd: String,
}

impl Session {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            cwd: "/".to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }
}

pub struct BridgeFs {
    session: Session,
    publisher: Arc<Publisher>,
    upload_limit: u64,
}

impl BridgeFs {
    pub fn new(root: PathBuf, publisher: Arc<Publisher>, upload_limit: u64) -> Self {
        info!("Virtual filesystem rooted at {}", root.display());
        Self {
            session: Session::new(root),
            publisher,
            upload_limit,
        }
    }

    pub fn root(&self) -> &Path {
        self.session.root()
    }
}

impl VirtualFs for BridgeFs {
    fn resolve_path(&self, requested: &str) -> ResolvedPath {
        paths::resolve(self.session.root(), self.session.cwd(), requested)
    }

    fn current_directory(&self) -> String {
        self.session.cwd.clone()
    }

    /// Always succeeds: the virtual tree has no real directories to check.
    fn change_directory(&mut self, requested: &str) -> String {
        let resolved = self.resolve_path(requested);
        debug!("cwd {} -> {}", self.session.cwd, resolved.client_path);
        self.session.cwd = resolved.client_path;
        self.session.cwd.clone()
    }

    fn stat(&self, name: &str) -> Result<FileStat, VfsError> {
        let resolved = self.resolve_path(name);
        let is_dir = resolved.client_path == "/";
        let name = if is_dir {
            "/".to_string()
        } else {
            resolved
                .client_path
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string()
        };

        Ok(FileStat {
            name,
            size: 0,
            is_dir,
            modified: SystemTime::now(),
        })
    }

    /// The virtual tree never materializes a listing.
    fn list(&self, _path: &str) -> Vec<FileStat> {
        Vec::new()
    }

    fn open_write(
        &mut self,
        name: &str,
        options: WriteOptions,
    ) -> Result<(UploadSink, String), VfsError> {
        if name.trim().is_empty() {
            return Err(VfsError::InvalidPath("empty upload destination".into()));
        }

        if options.append || options.start.is_some() {
            debug!("Ignoring append/restart for {}: uploads are whole-file writes", name);
        }

        let resolved = self.resolve_path(name);
        let destination = resolved.store_path.to_string_lossy().into_owned();
        let sink = UploadSink::new(destination, self.upload_limit, Arc::clone(&self.publisher));

        Ok((sink, resolved.client_path))
    }

    fn open_read(&self, name: &str) -> Result<Box<dyn AsyncRead + Send + Unpin>, VfsError> {
        debug!("Refusing download of {}", name);
        Err(VfsError::Unsupported("read"))
    }

    fn delete(&mut self, _path: &str) -> Result<(), VfsError> {
        Err(VfsError::Unsupported("delete"))
    }

    fn mkdir(&mut self, _path: &str) -> Result<String, VfsError> {
        Err(VfsError::Unsupported("mkdir"))
    }

    fn rename(&mut self, _from: &str, _to: &str) -> Result<(), VfsError> {
        Err(VfsError::Unsupported("rename"))
    }

    fn chmod(&mut self, _path: &str, _mode: u32) -> Result<(), VfsError> {
        Err(VfsError::Unsupported("chmod"))
    }

    fn unique_name(&self) -> String {
        paths::unique_name()
    }
}
