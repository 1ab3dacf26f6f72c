//! OS-keychain-backed credential store.

use super::CredentialStore;
use crate::{ApiError, Result};
use async_trait::async_trait;
use keyring::Entry;

const TOKEN_ENTRY: &str = "bearer-token";
const FLAG_PREFIX: &str = "flag-";

/// Stores the token and flags in the platform keychain via `keyring`.
///
/// One keychain entry per value under the given service name. Keychain
/// operations are fast local syscalls; they run inline on the calling task.
pub struct KeychainCredentialStore {
    service: String,
}

impl KeychainCredentialStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, name: &str) -> Result<Entry> {
        Entry::new(&self.service, name)
            .map_err(|e| ApiError::internal(format!("keychain entry unavailable: {}", e)))
    }

    fn read_entry(&self, name: &str) -> Result<Option<String>> {
        match self.entry(name)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(ApiError::internal(format!("keychain read failed: {}", e))),
        }
    }
}

#[async_trait]
impl CredentialStore for KeychainCredentialStore {
    async fn get(&self) -> Result<Option<String>> {
        self.read_entry(TOKEN_ENTRY)
    }

    async fn set(&self, token: &str) -> Result<()> {
        self.entry(TOKEN_ENTRY)?
            .set_password(token)
            .map_err(|e| ApiError::internal(format!("keychain write failed: {}", e)))
    }

    async fn remove(&self) -> Result<()> {
        match self.entry(TOKEN_ENTRY)?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(ApiError::internal(format!("keychain delete failed: {}", e))),
        }
    }

    async fn flag(&self, name: &str) -> Result<bool> {
        let entry_name = format!("{}{}", FLAG_PREFIX, name);
        Ok(self.read_entry(&entry_name)?.as_deref() == Some("true"))
    }

    async fn set_flag(&self, name: &str, value: bool) -> Result<()> {
        let entry_name = format!("{}{}", FLAG_PREFIX, name);
        self.entry(&entry_name)?
            .set_password(if value { "true" } else { "false" })
            .map_err(|e| ApiError::internal(format!("keychain write failed: {}", e)))
    }
}
