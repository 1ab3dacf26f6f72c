//! Durable credential persistence.
//!
//! The store owns the opaque bearer token (at most one active at a time) and
//! a handful of boolean UI flags the app persists alongside it. The client
//! depends only on this trait, never on a storage mechanism: it reads the
//! token once per outgoing call, and the auth flow writes it on login,
//! logout, and automatic 401 invalidation. The underlying primitives
//! serialize individual operations, so last write wins without extra locking
//! at the call sites.

use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

mod file;
mod keychain;

pub use file::FileCredentialStore;
pub use keychain::KeychainCredentialStore;

/// Narrow persistence interface the API client depends on.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Current bearer token, if an authenticated session exists.
    async fn get(&self) -> Result<Option<String>>;

    /// Replace the active token. Last write wins.
    async fn set(&self, token: &str) -> Result<()>;

    /// Delete the active token. Removing an absent token is not an error.
    async fn remove(&self) -> Result<()>;

    /// Read a boolean UI flag; unset flags read as `false`.
    async fn flag(&self, name: &str) -> Result<bool>;

    /// Persist a boolean UI flag.
    async fn set_flag(&self, name: &str, value: bool) -> Result<()>;
}

#[derive(Default)]
struct MemoryState {
    token: Option<String>,
    flags: HashMap<String, bool>,
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryCredentialStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|_| crate::ApiError::internal("credential store lock poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|_| crate::ApiError::internal("credential store lock poisoned"))
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self) -> Result<Option<String>> {
        Ok(self.read()?.token.clone())
    }

    async fn set(&self, token: &str) -> Result<()> {
        self.write()?.token = Some(token.to_string());
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        self.write()?.token = None;
        Ok(())
    }

    async fn flag(&self, name: &str) -> Result<bool> {
        Ok(self.read()?.flags.get(name).copied().unwrap_or(false))
    }

    async fn set_flag(&self, name: &str, value: bool) -> Result<()> {
        self.write()?.flags.insert(name.to_string(), value);
        Ok(())
    }
}
