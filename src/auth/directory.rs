//! Directory-service login
//!
//! Verifies a password by binding against a remote LDAP service: an
//! administrative bind locates the user entry, then a second bind with the
//! supplied password proves it. Every failure collapses into the same
//! authorization error; the cause stays in the server log and never
//! reaches the client.

use std::path::PathBuf;

use ldap3::{LdapConnAsync, Scope, SearchEntry, ldap_escape};
use log::{debug, warn};

use crate::error::AuthError;

pub struct DirectoryAuthenticator {
    url: String,
    bind_dn: String,
    bind_password: String,
    search_base: String,
    home_base: PathBuf,
}

impl DirectoryAuthenticator {
    pub fn new(
        url: String,
        bind_dn: String,
        bind_password: String,
        search_base: String,
        home_base: PathBuf,
    ) -> Self {
        Self {
            url,
            bind_dn,
            bind_password,
            search_base,
            home_base,
        }
    }

    /// Home root derived from the username; a fixed template, no directory
    /// attribute lookup.
    pub fn home_root(&self, username: &str) -> PathBuf {
        self.home_base.join(username)
    }

    /// One bind-authentication attempt. Accepts with the derived home root
    /// or rejects uniformly.
    pub async fn check(&self, username: &str, password: &str) -> Result<PathBuf, AuthError> {
        match self.bind_user(username, password).await {
            Ok(true) => Ok(self.home_root(username)),
            Ok(false) => {
                warn!("Directory login rejected for {}: no entry", username);
                Err(AuthError::InvalidCredentials)
            }
            Err(e) => {
                warn!("Directory login failed for {}: {}", username, e);
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Admin bind, uid search, then a bind as the found entry with the
    /// supplied password. `Ok(false)` means the user has no entry.
    async fn bind_user(&self, username: &str, password: &str) -> Result<bool, ldap3::LdapError> {
        let (conn, mut ldap) = LdapConnAsync::new(&self.url).await?;
        ldap3::drive!(conn);

        ldap.simple_bind(&self.bind_dn, &self.bind_password)
            .await?
            .success()?;

        let filter = format!("(uid={})", ldap_escape(username));
        let (entries, _) = ldap
            .search(&self.search_base, Scope::Subtree, &filter, vec!["dn"])
            .await?
            .success()?;

        let Some(entry) = entries.into_iter().next() else {
            debug!("No directory entry matches uid={}", username);
            let _ = ldap.unbind().await;
            return Ok(false);
        };

        let user_dn = SearchEntry::construct(entry).dn;
        ldap.simple_bind(&user_dn, password).await?.success()?;
        let _ = ldap.unbind().await;

        Ok(true)
    }
}
