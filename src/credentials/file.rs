//! JSON-file-backed credential store for platforms without a keychain.

use super::CredentialStore;
use crate::{ApiError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    token: Option<String>,
    #[serde(default)]
    flags: HashMap<String, bool>,
}

/// Persists the token and flags as one JSON document on disk.
///
/// Writers are serialized through an async mutex so concurrent set/remove
/// calls keep last-write-wins semantics on the whole document.
pub struct FileCredentialStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Document> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| ApiError::internal(format!("credential file corrupted: {}", e))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::default()),
            Err(e) => Err(ApiError::internal(format!(
                "credential file unreadable: {}",
                e
            ))),
        }
    }

    async fn persist(&self, doc: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ApiError::internal(format!("credential dir unavailable: {}", e)))?;
        }
        let bytes = serde_json::to_vec_pretty(doc)
            .map_err(|e| ApiError::internal(format!("credential encode failed: {}", e)))?;
        fs::write(&self.path, bytes)
            .await
            .map_err(|e| ApiError::internal(format!("credential write failed: {}", e)))
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self) -> Result<Option<String>> {
        Ok(self.load().await?.token)
    }

    async fn set(&self, token: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        doc.token = Some(token.to_string());
        self.persist(&doc).await
    }

    async fn remove(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        doc.token = None;
        self.persist(&doc).await
    }

    async fn flag(&self, name: &str) -> Result<bool> {
        Ok(self.load().await?.flags.get(name).copied().unwrap_or(false))
    }

    async fn set_flag(&self, name: &str, value: bool) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        doc.flags.insert(name.to_string(), value);
        self.persist(&doc).await
    }
}
