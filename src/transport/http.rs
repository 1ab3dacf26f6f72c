//! Shared `reqwest` client and the hot-swappable base URL.

use crate::request::ApiRequest;
use crate::{ApiError, Result};
use arc_swap::ArcSwap;
use reqwest::Proxy;
use std::env;
use std::sync::Arc;
use std::time::Duration;

/// Owns the connection pool and the base URL every path is joined onto.
///
/// The API client is the only component permitted to catch the error
/// returned by [`HttpTransport::dispatch`]; callers above it never see a raw
/// transport fault.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: ArcSwap<String>,
}

impl HttpTransport {
    /// Build the transport with production defaults (env-overridable).
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let timeout_secs = env::var("LUMORA_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);
        let timeout = timeout.unwrap_or(Duration::from_secs(timeout_secs));

        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(
                env::var("LUMORA_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(32),
            )
            .pool_idle_timeout(Some(Duration::from_secs(
                env::var("LUMORA_HTTP_POOL_IDLE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(90),
            )));

        if let Ok(proxy_url) = env::var("LUMORA_PROXY_URL") {
            if let Ok(proxy) = Proxy::all(&proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder
            .build()
            .map_err(|e| ApiError::internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: ArcSwap::from_pointee(base_url.to_string()),
        })
    }

    /// Replace the base URL for all subsequent requests. Latest wins.
    pub fn set_base_url(&self, base_url: impl Into<String>) {
        self.base_url.store(Arc::new(base_url.into()));
    }

    /// Base URL currently in effect.
    pub fn base_url(&self) -> Arc<String> {
        self.base_url.load_full()
    }

    /// Send one request.
    ///
    /// The base URL is read at dispatch time, so a `set_base_url` between
    /// two calls is observed by the second without coordination.
    pub async fn dispatch(
        &self,
        request: ApiRequest,
        token: Option<&str>,
        default_headers: &[(String, String)],
    ) -> std::result::Result<reqwest::Response, reqwest::Error> {
        let base_url = self.base_url.load_full();
        request
            .into_builder(&self.client, base_url.as_str(), token, default_headers)
            .send()
            .await
    }
}
