//! Static-credential login
//!
//! Password verification against the in-memory credential store. Anonymous
//! mode accepts any login but still honors a known user's root override.

use std::path::PathBuf;

use log::{info, warn};

use super::credentials::CredentialStore;
use crate::error::AuthError;

pub struct StaticValidator {
    store: CredentialStore,
    anonymous: bool,
    default_root: PathBuf,
}

impl StaticValidator {
    pub fn new(store: CredentialStore, anonymous: bool, default_root: PathBuf) -> Self {
        Self {
            store,
            anonymous,
            default_root,
        }
    }

    /// Resolves the session root for an accepted login, or rejects.
    pub fn check(&self, username: &str, password: &str) -> Result<PathBuf, AuthError> {
        let entry = self.store.get(username);
        let password_matches = entry.is_some_and(|e| e.password == password);

        if self.anonymous || password_matches {
            let root = entry
                .and_then(|e| e.root.clone())
                .unwrap_or_else(|| self.default_root.clone());
            info!("Login accepted for {} (root {})", username, root.display());
            Ok(root)
        } else {
            warn!("Login rejected for {}", username);
            Err(AuthError::InvalidCredentials)
        }
    }
}
