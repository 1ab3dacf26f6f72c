//! # lumora-client
//!
//! Resilient API client core for the Lumora mobile application: the single
//! chokepoint through which every screen and service module talks to the
//! remote backend.
//!
//! ## Overview
//!
//! The client injects authentication state asynchronously on every call,
//! normalizes heterogeneous transport and server failures into one closed
//! taxonomy, passes binary/multipart payloads through untouched, and always
//! resolves to a uniform envelope: callers branch on the outcome, they
//! never catch transport exceptions.
//!
//! ## Key pieces
//!
//! - **Unified client**: [`ApiClient`] with `get`/`post`/`put`/`patch`/
//!   `delete`/`upload`/`download`, all funneling through one normalization
//!   path
//! - **Envelope**: [`ApiResponse`], success and failure as separate
//!   variants, mutually exclusive by construction
//! - **Classifier**: [`classify`], a pure decision table from transport
//!   outcome to [`ApiError`]
//! - **Credential store**: [`credentials::CredentialStore`], injected at
//!   construction, read once per call, cleared automatically on 401
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use lumora_client::{ApiClient, RequestBody};
//! use serde_json::{json, Value};
//!
//! #[tokio::main]
//! async fn main() -> lumora_client::Result<()> {
//!     let client = ApiClient::builder()
//!         .base_url("https://api.lumora.app/v1")
//!         .build()?;
//!
//!     let response = client
//!         .post::<Value>(
//!             "/user/authenticate",
//!             RequestBody::json(json!({"phoneNumber": "9999999999"})),
//!             None,
//!         )
//!         .await;
//!
//!     if response.is_success() {
//!         println!("logged in: {:?}", response.data());
//!     } else {
//!         println!("failed: {}", response.message());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Orchestrator and builder |
//! | [`envelope`] | The uniform response envelope |
//! | [`classify`] | Pure failure classification |
//! | [`error_code`] | Closed error taxonomy |
//! | [`request`] | Request envelope: body tagging, options, assembly |
//! | [`credentials`] | Durable token + UI-flag persistence |
//! | [`transport`] | `reqwest`-backed HTTP transport |

pub mod classify;
pub mod client;
pub mod credentials;
pub mod envelope;
pub mod error;
pub mod error_code;
pub mod request;
pub mod transport;

// Re-export main types for convenience
pub use classify::{classify, TransportFailure};
pub use client::{ApiClient, ApiClientBuilder};
pub use credentials::{
    CredentialStore, FileCredentialStore, KeychainCredentialStore, MemoryCredentialStore,
};
pub use envelope::ApiResponse;
pub use error::ApiError;
pub use error_code::ErrorCode;
pub use request::{ApiRequest, RequestBody, RequestOptions};

/// Result type alias for fallible non-call surfaces (stores, builder).
/// Client calls themselves resolve to [`ApiResponse`] and never error.
pub type Result<T> = std::result::Result<T, ApiError>;
