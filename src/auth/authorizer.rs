//! Module `authorizer`
//!
//! One login decision per connection attempt. The credential backend is
//! chosen once at startup from configuration; a running process never
//! consults the other backend's data. On success the session filesystem is
//! built, rooted at the resolved home.

use std::path::PathBuf;
use std::sync::Arc;

use log::info;

use super::credentials::CredentialStore;
use super::directory::DirectoryAuthenticator;
use super::validator::StaticValidator;
use crate::config::{AuthBackendConfig, BridgeConfig};
use crate::error::AuthError;
use crate::publish::Publisher;
use crate::vfs::{BridgeFs, VirtualFs};

const MAX_CREDENTIAL_LENGTH: usize = 128;

/// Successful login: the resolved session root and the filesystem bound to
/// it, handed back to the protocol engine.
pub struct LoginOutcome {
    pub root: PathBuf,
    pub fs: Box<dyn VirtualFs>,
}

enum Backend {
    Static(StaticValidator),
    Directory(DirectoryAuthenticator),
}

pub struct Authorizer {
    backend: Backend,
    publisher: Arc<Publisher>,
    upload_limit: u64,
}

impl Authorizer {
    pub fn from_config(config: &BridgeConfig, publisher: Arc<Publisher>) -> Self {
        let backend = match &config.auth {
            AuthBackendConfig::Static { credentials } => {
                info!("Using static credential store ({} users)", credentials.len());
                Backend::Static(StaticValidator::new(
                    CredentialStore::from_entries(credentials),
                    config.anonymous,
                    config.root.clone(),
                ))
            }
            AuthBackendConfig::Directory {
                url,
                bind_dn,
                bind_password,
                search_base,
                home_base,
            } => {
                info!("Using directory service at {}", url);
                Backend::Directory(DirectoryAuthenticator::new(
                    url.clone(),
                    bind_dn.clone(),
                    bind_password.clone(),
                    search_base.clone(),
                    home_base.clone(),
                ))
            }
        };

        Self {
            backend,
            publisher,
            upload_limit: config.max_upload_bytes(),
        }
    }

    /// Decides one login attempt and, on success, builds the session
    /// filesystem rooted at the resolved home.
    pub async fn authorize(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        check_username(username)?;
        check_password(password)?;

        let root = match &self.backend {
            Backend::Static(validator) => validator.check(username, password)?,
            Backend::Directory(directory) => directory.check(username, password).await?,
        };

        let fs = BridgeFs::new(root.clone(), Arc::clone(&self.publisher), self.upload_limit);
        Ok(LoginOutcome {
            root,
            fs: Box::new(fs),
        })
    }
}

/// Basic input sanitation before any backend is consulted.
fn check_username(username: &str) -> Result<(), AuthError> {
    if username.trim().is_empty()
        || username.len() > MAX_CREDENTIAL_LENGTH
        || username.contains(['\r', '\n', '\0'])
    {
        return Err(AuthError::MalformedInput("invalid username format".into()));
    }
    Ok(())
}

/// Passwords may be empty (anonymous logins), but never control characters.
fn check_password(password: &str) -> Result<(), AuthError> {
    if password.len() > MAX_CREDENTIAL_LENGTH || password.contains(['\r', '\n', '\0']) {
        return Err(AuthError::MalformedInput("invalid password format".into()));
    }
    Ok(())
}
