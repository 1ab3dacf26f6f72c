use crate::client::core::ApiClient;
use crate::credentials::{CredentialStore, MemoryCredentialStore};
use crate::transport::HttpTransport;
use crate::{ApiError, Result};
use arc_swap::ArcSwapOption;
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`ApiClient`].
///
/// The credential store is an explicit constructor-time dependency; there is
/// no process-global token state, so a test can hand the client a fake store
/// and observe every credential read and write.
pub struct ApiClientBuilder {
    base_url: Option<String>,
    store: Option<Arc<dyn CredentialStore>>,
    timeout: Option<Duration>,
    default_headers: Vec<(String, String)>,
}

impl ApiClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            store: None,
            timeout: None,
            default_headers: Vec::new(),
        }
    }

    /// Base URL every request path is joined onto. Required.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Inject the credential store. Defaults to an in-memory store, which is
    /// what tests want; production wiring passes the keychain or file store.
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Transport timeout applied to every call (per-call overrides win).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Header attached to every request, e.g. an app-version tag. Caller
    /// headers on an individual request win over these.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ApiClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| ApiError::internal("base URL is required"))?;
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryCredentialStore::new()));
        let transport = HttpTransport::new(&base_url, self.timeout)?;

        Ok(ApiClient {
            transport,
            store,
            default_token: ArcSwapOption::from(None),
            default_headers: self.default_headers,
        })
    }
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
