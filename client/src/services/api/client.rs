//! # API Client
//!
//! Main HTTP gateway for backend API communication. Every REST wrapper goes
//! through [`ApiClient::execute`], which owns bearer attachment, the 401
//! logout path, 204 handling and error-body normalisation.

use std::sync::Arc;
use std::time::Instant;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared::{AuthResponse, ErrorResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, User};
use tracing::{debug, error, warn};

use crate::config::{ClientConfig, LOGIN_ROUTE};
use crate::core::{AuthApi, ClientError, Navigator, Result};
use crate::stores::SessionStore;

/// HTTP client for communicating with the backend API server.
///
/// Holds a pooled `reqwest::Client`; cheap to share behind an `Arc`.
pub struct ApiClient {
    pub(crate) client: Client,
    base_url: String,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a client for `config.api_url` with the configured timeout.
    pub fn new(
        config: &ClientConfig,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            session,
            navigator,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Send one request. `Ok(None)` means the server answered 204.
    ///
    /// - `requires_auth` attaches `Authorization: Bearer <token>` when a token exists
    /// - 401 on an authenticated call clears the session, navigates to the
    ///   login route and fails with [`ClientError::Unauthorized`]
    /// - 401 on an anonymous call fails with [`ClientError::Auth`] and leaves
    ///   any stored session in place (a failed re-login does not sign out)
    /// - other non-2xx fail with [`ClientError::Http`]
    #[tracing::instrument(skip(self, body, method), fields(method = %method))]
    pub async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        requires_auth: bool,
    ) -> Result<Option<Value>> {
        let start = Instant::now();

        let mut request = self
            .client
            .request(method, self.url(endpoint))
            .header(CONTENT_TYPE, "application/json");
        if requires_auth {
            if let Some(token) = self.session.token() {
                request = request.bearer_auth(token);
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            error!(error = %e, "Network error");
            ClientError::Network(e.to_string())
        })?;

        let status = response.status();
        let duration_ms = start.elapsed().as_millis() as u64;

        if status == StatusCode::UNAUTHORIZED {
            let message = error_message(response, status).await;
            if requires_auth {
                warn!(duration_ms, error = %message, "Session rejected, logging out");
                self.session.clear();
                self.navigator.navigate(LOGIN_ROUTE);
                return Err(ClientError::Unauthorized);
            }
            warn!(duration_ms, error = %message, "Credentials rejected");
            return Err(ClientError::Auth(message));
        }

        if !status.is_success() {
            let message = error_message(response, status).await;
            warn!(
                status = status.as_u16(),
                error = %message,
                duration_ms,
                "Request failed"
            );
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        if status == StatusCode::NO_CONTENT {
            debug!(duration_ms, "Request succeeded with no content");
            return Ok(None);
        }

        let bytes = response.bytes().await.map_err(|e| {
            error!(error = %e, "Failed to read response body");
            ClientError::Network(e.to_string())
        })?;
        let value = serde_json::from_slice::<Value>(&bytes).map_err(|e| {
            error!(error = %e, "Response body is not JSON");
            ClientError::Decode(e.to_string())
        })?;

        debug!(status = status.as_u16(), duration_ms, "Request succeeded");
        Ok(Some(value))
    }

    async fn send_typed<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        requires_auth: bool,
    ) -> Result<T> {
        let value = self
            .execute(method, endpoint, body.as_ref(), requires_auth)
            .await?;
        decode(value)
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.send_typed(Method::GET, endpoint, None, true).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        self.send_typed(Method::POST, endpoint, Some(encode(body)?), true)
            .await
    }

    /// POST without a body (action endpoints such as `/cancel`).
    pub async fn post_empty<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.send_typed(Method::POST, endpoint, None, true).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        self.send_typed(Method::PUT, endpoint, Some(encode(body)?), true)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.send_typed(Method::DELETE, endpoint, None, true).await
    }

    /// POST without credentials (login, register).
    pub async fn post_anonymous<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        self.send_typed(Method::POST, endpoint, Some(encode(body)?), false)
            .await
    }
}

// Implement AuthApi trait for ApiClient
#[async_trait::async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse> {
        crate::services::api::auth::login(self, credentials).await
    }

    async fn register(&self, details: &RegisterRequest) -> Result<AuthResponse> {
        crate::services::api::auth::register(self, details).await
    }

    async fn current_user(&self) -> Result<User> {
        crate::services::api::auth::current_user(self).await
    }

    async fn update_profile(&self, changes: &UpdateProfileRequest) -> Result<User> {
        crate::services::api::auth::update_profile(self, changes).await
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| ClientError::Validation(format!("Unserializable request body: {e}")))
}

/// A 204 decodes as JSON `null`: fine for `()` and `Option<_>`, a
/// [`ClientError::Decode`] for anything else.
fn decode<T: DeserializeOwned>(value: Option<Value>) -> Result<T> {
    serde_json::from_value(value.unwrap_or(Value::Null)).map_err(|e| ClientError::Decode(e.to_string()))
}

async fn error_message(response: Response, status: StatusCode) -> String {
    response
        .json::<ErrorResponse>()
        .await
        .ok()
        .map(|body| body.error)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
