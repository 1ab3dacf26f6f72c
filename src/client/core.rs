use crate::classify::{classify, TransportFailure};
use crate::credentials::CredentialStore;
use crate::envelope::ApiResponse;
use crate::error::ApiError;
use crate::error_code::ErrorCode;
use crate::request::{ApiRequest, RequestBody, RequestOptions};
use crate::transport::HttpTransport;
use arc_swap::ArcSwapOption;
use bytes::Bytes;
use reqwest::multipart::Form;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// The single chokepoint between the app and the backend.
///
/// Every verb funnels through [`ApiClient::request`], which reads the
/// credential at call time, assembles the envelope, dispatches over the
/// transport, and normalizes the outcome. `request` is total: it always
/// resolves to an [`ApiResponse`], never panics, and never lets a transport
/// fault escape to the caller.
pub struct ApiClient {
    pub(crate) transport: HttpTransport,
    pub(crate) store: Arc<dyn CredentialStore>,
    /// In-memory default-token hook, consulted before the store. Installed
    /// by `set_auth_token`, cleared by `remove_auth_token` and on 401.
    pub(crate) default_token: ArcSwapOption<String>,
    pub(crate) default_headers: Vec<(String, String)>,
}

impl ApiClient {
    /// Create a builder.
    pub fn builder() -> crate::client::builder::ApiClientBuilder {
        crate::client::builder::ApiClientBuilder::new()
    }

    /// Execute one request and normalize the outcome.
    pub async fn request<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResponse<T> {
        let method = request.method.clone();
        let path = request.path.clone();
        let token = self.current_token().await;

        debug!(%method, %path, "dispatching request");

        match self
            .transport
            .dispatch(request, token.as_deref(), &self.default_headers)
            .await
        {
            Ok(response) => self.unwrap_response(response).await,
            Err(err) => {
                self.classified_failure(TransportFailure::from_reqwest(&err))
                    .await
            }
        }
    }

    /// GET a resource.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: Option<RequestOptions>,
    ) -> ApiResponse<T> {
        self.request(assemble(Method::GET, path, RequestBody::None, options))
            .await
    }

    /// POST a body.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: RequestBody,
        options: Option<RequestOptions>,
    ) -> ApiResponse<T> {
        self.request(assemble(Method::POST, path, body, options))
            .await
    }

    /// PUT (replace) a resource.
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: RequestBody,
        options: Option<RequestOptions>,
    ) -> ApiResponse<T> {
        self.request(assemble(Method::PUT, path, body, options)).await
    }

    /// PATCH (partially update) a resource.
    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        body: RequestBody,
        options: Option<RequestOptions>,
    ) -> ApiResponse<T> {
        self.request(assemble(Method::PATCH, path, body, options))
            .await
    }

    /// DELETE a resource.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: Option<RequestOptions>,
    ) -> ApiResponse<T> {
        self.request(assemble(Method::DELETE, path, RequestBody::None, options))
            .await
    }

    /// POST a multipart form (file uploads). The form is handed to the
    /// transport verbatim; its boundary and part headers are never touched.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
        options: Option<RequestOptions>,
    ) -> ApiResponse<T> {
        self.request(assemble(
            Method::POST,
            path,
            RequestBody::Multipart(form),
            options,
        ))
        .await
    }

    /// Fetch a binary payload as raw bytes.
    ///
    /// Intentional asymmetry: there is no structured body to unwrap, so this
    /// bypasses the envelope and returns the bytes directly. Failures are
    /// still classified, and a 401 still invalidates the session.
    pub async fn download(
        &self,
        path: &str,
        options: Option<RequestOptions>,
    ) -> crate::Result<Bytes> {
        let request = assemble(Method::GET, path, RequestBody::None, options);
        let token = self.current_token().await;

        debug!(%path, "downloading binary payload");

        let response = match self
            .transport
            .dispatch(request, token.as_deref(), &self.default_headers)
            .await
        {
            Ok(response) => response,
            Err(err) => {
                return Err(self
                    .classify_and_invalidate(TransportFailure::from_reqwest(&err))
                    .await)
            }
        };

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let failure = TransportFailure::Status {
                status: status.as_u16(),
                body: parse_body(&text),
            };
            return Err(self.classify_and_invalidate(failure).await);
        }

        response
            .bytes()
            .await
            .map_err(|err| classify(&TransportFailure::from_reqwest(&err)))
    }

    /// Point all subsequent requests at a different base URL. Latest wins.
    pub fn set_base_url(&self, base_url: impl Into<String>) {
        self.transport.set_base_url(base_url);
    }

    /// Install the default-token hook: every future request is stamped with
    /// this token until it is replaced or removed. The durable store is not
    /// written; login flows persist through the store directly.
    pub fn set_auth_token(&self, token: impl Into<String>) {
        self.default_token.store(Some(Arc::new(token.into())));
    }

    /// Clear the default-token hook. The durable store is untouched.
    pub fn remove_auth_token(&self) {
        self.default_token.store(None);
    }

    /// The injected credential store, for app code that persists logins.
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Token for the next request: the hook wins, then the store, read fresh
    /// on every call so a refresh between two calls is observed by the next.
    async fn current_token(&self) -> Option<String> {
        if let Some(token) = self.default_token.load_full() {
            return Some(token.as_ref().clone());
        }
        match self.store.get().await {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "credential read failed; sending unauthenticated");
                None
            }
        }
    }

    async fn unwrap_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ApiResponse<T> {
        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => {
                return self
                    .classified_failure(TransportFailure::from_reqwest(&err))
                    .await
            }
        };
        let body = parse_body(&text);

        if !status.is_success() {
            return self
                .classified_failure(TransportFailure::Status {
                    status: status.as_u16(),
                    body,
                })
                .await;
        }

        let body = body.unwrap_or(Value::Null);
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Success")
            .to_string();
        // Server envelope unwrap: a nested `data` field is the payload;
        // otherwise the whole body is.
        let payload = match body.get("data") {
            Some(inner) => inner.clone(),
            None => body,
        };

        match serde_json::from_value::<T>(payload.clone()) {
            Ok(data) => ApiResponse::success(data, status.as_u16(), message),
            Err(err) => {
                warn!(status = status.as_u16(), error = %err, "success body failed to decode");
                let error =
                    ApiError::new(ErrorCode::Unknown, status.as_u16(), "Failed to decode response body.")
                        .with_details(payload.clone());
                ApiResponse::failure_with_body(error, Some(payload))
            }
        }
    }

    async fn classified_failure<T>(&self, failure: TransportFailure) -> ApiResponse<T> {
        let body = match &failure {
            TransportFailure::Status { body, .. } => body.clone(),
            _ => None,
        };
        let error = self.classify_and_invalidate(failure).await;
        let invalidated = error.code == ErrorCode::Unauthorized;
        ApiResponse::failure_with_body(error, body).with_session_invalidated(invalidated)
    }

    /// Classify, and on `UNAUTHORIZED` run the invalidation handler before
    /// the caller sees the error.
    async fn classify_and_invalidate(&self, failure: TransportFailure) -> ApiError {
        let error = classify(&failure);
        warn!(code = %error.code, status = error.status, "request failed");
        if error.code == ErrorCode::Unauthorized {
            self.invalidate_session().await;
        }
        error
    }

    /// The single designated handler for session invalidation: clears the
    /// default-token hook and the durable credential, so the next
    /// authenticated-state check observes a logged-out session. Store faults
    /// are logged, never propagated; the classified 401 still reaches the
    /// caller.
    async fn invalidate_session(&self) {
        self.default_token.store(None);
        if let Err(err) = self.store.remove().await {
            warn!(error = %err, "failed to clear stored credential");
        }
    }
}

fn assemble(
    method: Method,
    path: &str,
    body: RequestBody,
    options: Option<RequestOptions>,
) -> ApiRequest {
    ApiRequest::new(method, path)
        .with_body(body)
        .with_options(options.unwrap_or_default())
}

/// Lenient body parse: empty bodies yield nothing, non-JSON bodies are kept
/// as a raw string value so error details survive.
fn parse_body(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(text.to_string())),
    }
}
