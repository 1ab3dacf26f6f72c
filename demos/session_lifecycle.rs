//! Session lifecycle example.
//!
//! Authenticates with a phone number, persists the returned bearer token in
//! a file-backed store, and shows the automatic invalidation a 401 triggers.
//!
//! Usage:
//!   LUMORA_API_URL="https://api.lumora.app/v1" cargo run --example session_lifecycle

use lumora_client::{ApiClient, CredentialStore, FileCredentialStore, RequestBody};
use serde_json::{json, Value};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let base_url = std::env::var("LUMORA_API_URL")
        .unwrap_or_else(|_| "https://api.lumora.app/v1".to_string());

    let store = Arc::new(FileCredentialStore::new(
        std::env::temp_dir().join("lumora-session.json"),
    ));
    let client = ApiClient::builder()
        .base_url(base_url)
        .credential_store(store.clone())
        .build()?;

    // Authenticate and persist the session token.
    let login = client
        .post::<Value>(
            "/user/authenticate",
            RequestBody::json(json!({"phoneNumber": "9999999999"})),
            None,
        )
        .await;

    if let Some(token) = login
        .data()
        .and_then(|d| d.get("token"))
        .and_then(Value::as_str)
    {
        store.set(token).await?;
        store.set_flag("onboarding_complete", true).await?;
        println!("Logged in; token persisted.");
    } else {
        println!("Login failed: {}", login.message());
        return Ok(());
    }

    // Every subsequent call reads the token fresh from the store.
    let profile = client.get::<Value>("/user/current-user", None).await;
    println!("Profile fetch: {}", profile.message());

    // When the backend revokes the session, the 401 clears the store and the
    // envelope says so; the navigation layer reacts to the signal.
    if profile.session_invalidated() {
        println!("Session was invalidated; stored token is gone.");
        assert_eq!(store.get().await?, None);
    }

    Ok(())
}
