//! End-to-end envelope behavior against a mock HTTP server.

use lumora_client::{
    ApiClient, CredentialStore, ErrorCode, MemoryCredentialStore, RequestBody, RequestOptions,
};
use mockito::{Matcher, Server};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    id: u64,
    name: String,
}

fn client_for(server: &Server) -> ApiClient {
    ApiClient::builder()
        .base_url(server.url())
        .build()
        .expect("client should build")
}

async fn client_with_token(server: &Server, token: &str) -> (ApiClient, Arc<MemoryCredentialStore>) {
    let store = Arc::new(MemoryCredentialStore::new());
    store.set(token).await.expect("store set");
    let client = ApiClient::builder()
        .base_url(server.url())
        .credential_store(store.clone())
        .build()
        .expect("client should build");
    (client, store)
}

#[tokio::test]
async fn success_unwraps_nested_data_and_message() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/user/current-user")
        .match_header("authorization", "Bearer valid-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data": {"id": 7, "name": "Asha"}, "message": "Fetched"}"#)
        .create_async()
        .await;

    let (client, _store) = client_with_token(&server, "valid-token").await;
    let response = client.get::<User>("/user/current-user", None).await;

    assert!(response.is_success());
    assert_eq!(response.status(), 200);
    assert_eq!(response.message(), "Fetched");
    assert_eq!(
        response.data(),
        Some(&User {
            id: 7,
            name: "Asha".into()
        })
    );
    assert!(response.error().is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn success_without_nested_data_uses_whole_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/plans/active")
        .with_status(200)
        .with_body(r#"{"id": 3, "name": "Gold"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let response = client.get::<Value>("/plans/active", None).await;

    assert!(response.is_success());
    assert_eq!(response.message(), "Success");
    assert_eq!(response.data(), Some(&json!({"id": 3, "name": "Gold"})));
}

#[tokio::test]
async fn validation_failure_surfaces_server_message_and_raw_body() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/user/authenticate")
        .with_status(400)
        .with_body(r#"{"message": "Invalid phone", "field": "phoneNumber"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let response = client
        .post::<Value>(
            "/user/authenticate",
            RequestBody::json(json!({"phoneNumber": "9999999999"})),
            None,
        )
        .await;

    assert!(!response.is_success());
    assert_eq!(response.status(), 400);
    let error = response.error().expect("failure carries an error");
    assert_eq!(error.code, ErrorCode::ValidationError);
    assert_eq!(error.message, "Invalid phone");
    // Raw failing body is preserved on the envelope.
    match &response {
        lumora_client::ApiResponse::Failure { data, .. } => {
            assert_eq!(
                data.as_ref().and_then(|b| b.get("field")),
                Some(&json!("phoneNumber"))
            );
        }
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn unauthorized_clears_injected_store_and_signals() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/user/current-user")
        .with_status(401)
        .with_body(r#"{"message": "token expired"}"#)
        .create_async()
        .await;

    let (client, store) = client_with_token(&server, "stale-token").await;
    let response = client.get::<User>("/user/current-user", None).await;

    assert_eq!(
        response.error().map(|e| e.code),
        Some(ErrorCode::Unauthorized)
    );
    assert!(response.session_invalidated());
    assert_eq!(store.get().await.unwrap(), None);
}

#[tokio::test]
async fn network_failure_classifies_to_status_zero() {
    // Nothing listens here; the connection is refused.
    let client = ApiClient::builder()
        .base_url("http://127.0.0.1:9")
        .build()
        .expect("client should build");

    let response = client.get::<Value>("/anything", None).await;

    assert!(!response.is_success());
    assert_eq!(response.status(), 0);
    assert_eq!(
        response.error().map(|e| e.code),
        Some(ErrorCode::NetworkError)
    );
}

#[tokio::test]
async fn unmapped_status_keeps_status_and_body_in_details() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", "/bookings/55")
        .with_status(409)
        .with_body(r#"{"message": "already cancelled"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let response = client.delete::<Value>("/bookings/55", None).await;

    let error = response.error().expect("failure carries an error");
    assert_eq!(error.code, ErrorCode::Unknown);
    assert_eq!(error.status, 409);
    assert_eq!(error.message, "already cancelled");
    assert_eq!(
        error.details.as_ref().and_then(|d| d.get("message")),
        Some(&json!("already cancelled"))
    );
}

#[tokio::test]
async fn absent_credential_still_sends_empty_bearer() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/catalog/categories")
        .match_header("authorization", Matcher::Regex("^Bearer ?$".into()))
        .with_status(200)
        .with_body("{\"data\": []}")
        .create_async()
        .await;

    let client = client_for(&server);
    let response = client.get::<Vec<Value>>("/catalog/categories", None).await;

    assert!(response.is_success());
    mock.assert_async().await;
}

#[tokio::test]
async fn auth_token_hook_wins_over_stored_credential() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/user/current-user")
        .match_header("authorization", "Bearer hook-token")
        .with_status(200)
        .with_body(r#"{"data": {"id": 1, "name": "Ravi"}}"#)
        .create_async()
        .await;

    let (client, _store) = client_with_token(&server, "stored-token").await;
    client.set_auth_token("hook-token");
    let response = client.get::<User>("/user/current-user", None).await;
    assert!(response.is_success());
    mock.assert_async().await;

    // Removing the hook falls back to the stored credential.
    client.remove_auth_token();
    let fallback = server
        .mock("GET", "/user/current-user")
        .match_header("authorization", "Bearer stored-token")
        .with_status(200)
        .with_body(r#"{"data": {"id": 1, "name": "Ravi"}}"#)
        .create_async()
        .await;
    let response = client.get::<User>("/user/current-user", None).await;
    assert!(response.is_success());
    fallback.assert_async().await;
}

#[tokio::test]
async fn caller_headers_and_query_reach_the_wire() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/catalog/products")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .match_header("x-app-version", "4.2.0")
        .with_status(200)
        .with_body("{\"data\": []}")
        .create_async()
        .await;

    let client = client_for(&server);
    let options = RequestOptions::new()
        .header("x-app-version", "4.2.0")
        .query("page", "2");
    let response = client.get::<Vec<Value>>("/catalog/products", Some(options)).await;

    assert!(response.is_success());
    mock.assert_async().await;
}

#[tokio::test]
async fn upload_sends_multipart_verbatim() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/user/profile")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=.*".into()),
        )
        .match_body(Matcher::Regex("IMAGE-BYTES-0123456789".into()))
        .with_status(200)
        .with_body(r#"{"data": {"avatarUrl": "https://cdn.lumora.app/u/7.png"}}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let form = Form::new().part(
        "avatar",
        Part::bytes(b"IMAGE-BYTES-0123456789".to_vec())
            .file_name("avatar.png")
            .mime_str("image/png")
            .expect("valid mime"),
    );
    let response = client.upload::<Value>("/user/profile", form, None).await;

    assert!(response.is_success());
    assert_eq!(
        response.data().and_then(|d| d.get("avatarUrl")),
        Some(&json!("https://cdn.lumora.app/u/7.png"))
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn download_returns_raw_bytes() {
    let payload: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x00, 0xff, 0x10, 0x03];
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/files/receipt.png")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(payload)
        .create_async()
        .await;

    let client = client_for(&server);
    let bytes = client
        .download("/files/receipt.png", None)
        .await
        .expect("download succeeds");
    assert_eq!(bytes.as_ref(), payload);
}

#[tokio::test]
async fn download_failures_are_classified_and_invalidate_on_401() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/files/missing.png")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("GET", "/files/locked.png")
        .with_status(401)
        .create_async()
        .await;

    let (client, store) = client_with_token(&server, "stale-token").await;

    let not_found = client.download("/files/missing.png", None).await;
    assert_eq!(not_found.unwrap_err().code, ErrorCode::NotFound);

    let locked = client.download("/files/locked.png", None).await;
    assert_eq!(locked.unwrap_err().code, ErrorCode::Unauthorized);
    assert_eq!(store.get().await.unwrap(), None);
}

#[tokio::test]
async fn set_base_url_latest_wins() {
    let mut first = Server::new_async().await;
    let mut second = Server::new_async().await;

    let stale = first
        .mock("GET", "/ping")
        .with_status(200)
        .with_body("{}")
        .expect(0)
        .create_async()
        .await;
    let live = second
        .mock("GET", "/ping")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let client = client_for(&first);
    client.set_base_url(first.url());
    client.set_base_url(second.url());

    let response = client.get::<Value>("/ping", None).await;
    assert!(response.is_success());
    stale.assert_async().await;
    live.assert_async().await;
}

#[tokio::test]
async fn undecodable_success_body_normalizes_to_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/user/current-user")
        .with_status(200)
        .with_body(r#"{"data": "not-a-user"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let response = client.get::<User>("/user/current-user", None).await;

    assert!(!response.is_success());
    let error = response.error().expect("decode failure is a failure");
    assert_eq!(error.code, ErrorCode::Unknown);
    assert_eq!(error.status, 200);
    assert_eq!(error.details, Some(json!("not-a-user")));
}
