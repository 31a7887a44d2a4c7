//! Credential storage
//!
//! The static username table for password logins, built once from
//! configuration and read-only afterwards.

use std::collections::HashMap;

use log::warn;

use crate::config::CredentialEntry;

pub struct CredentialStore {
    entries: HashMap<String, CredentialEntry>,
}

impl CredentialStore {
    pub fn from_entries(entries: &[CredentialEntry]) -> Self {
        let mut map = HashMap::with_capacity(entries.len());
        for entry in entries {
            if map.insert(entry.username.clone(), entry.clone()).is_some() {
                warn!("Duplicate credential entry for {}; keeping the last one", entry.username);
            }
        }
        Self { entries: map }
    }

    pub fn get(&self, username: &str) -> Option<&CredentialEntry> {
        self.entries.get(username)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
