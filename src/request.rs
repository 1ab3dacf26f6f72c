//! Outgoing request envelope: body tagging, caller options, and assembly.
//!
//! The body kind is an explicit variant chosen by the caller, not inferred by
//! inspecting the value at runtime. Multipart forms are handed to the
//! transport untouched so the boundary header and part encoding stay intact.

use crate::Result;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::Form;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Correlation header stamped on every outgoing request.
pub(crate) const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tagged request body.
pub enum RequestBody {
    /// No body (GET, DELETE, bodiless POST).
    None,
    /// JSON-serialized body; the transport sets `Content-Type: application/json`.
    Json(Value),
    /// Multipart form; sent verbatim, boundary and part headers untouched.
    Multipart(Form),
}

impl RequestBody {
    /// JSON body from an already-built value.
    pub fn json(value: Value) -> Self {
        RequestBody::Json(value)
    }

    /// JSON body serialized from any `Serialize` type.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        let value = serde_json::to_value(value)
            .map_err(|e| crate::ApiError::internal(format!("failed to serialize body: {}", e)))?;
        Ok(RequestBody::Json(value))
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, RequestBody::Multipart(_))
    }
}

impl Default for RequestBody {
    fn default() -> Self {
        RequestBody::None
    }
}

// Form has no useful Debug output; print the variant only.
impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::None => f.write_str("RequestBody::None"),
            RequestBody::Json(v) => write!(f, "RequestBody::Json({})", v),
            RequestBody::Multipart(_) => f.write_str("RequestBody::Multipart(..)"),
        }
    }
}

/// Caller-supplied extras merged into the envelope.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra headers; merged last, so they win over client defaults.
    pub headers: Vec<(String, String)>,
    /// Query string pairs.
    pub query: Vec<(String, String)>,
    /// Per-call timeout override; the transport default applies otherwise.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// One outgoing request, created fresh per call and never reused.
#[derive(Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
    pub options: RequestOptions,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::None,
            options: RequestOptions::default(),
        }
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Assembles the wire request.
    ///
    /// Header precedence, first to last: client defaults, caller headers,
    /// `Authorization`, `x-request-id`. The bearer header is always attached;
    /// an absent credential yields an empty bearer value, matching what the
    /// backend has always been sent. The body goes on last so a multipart
    /// form controls its own `Content-Type`.
    pub(crate) fn into_builder(
        self,
        client: &reqwest::Client,
        base_url: &str,
        token: Option<&str>,
        default_headers: &[(String, String)],
    ) -> reqwest::RequestBuilder {
        let url = format!("{}{}", base_url, self.path);
        let mut builder = client.request(self.method, &url);

        if !self.options.query.is_empty() {
            builder = builder.query(&self.options.query);
        }

        for (name, value) in default_headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        for (name, value) in &self.options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = builder
            .header(AUTHORIZATION, format!("Bearer {}", token.unwrap_or("")))
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string());

        if let Some(timeout) = self.options.timeout {
            builder = builder.timeout(timeout);
        }

        match self.body {
            RequestBody::None => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(form),
        }
    }
}
