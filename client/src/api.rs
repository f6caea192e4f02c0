//! HTTP client for the auth endpoints.

use crate::errors::ApiError;
use crate::models::{
    AuthResponse, LoginRequest, LogoutResponse, MeResponse, RegisterRequest, UserProfile,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// The auth operations a session depends on.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;
    /// Resolves a token to the current profile (`GET /auth/me`).
    async fn me(&self, token: &str) -> Result<UserProfile, ApiError>;
    async fn logout(&self, token: Option<&str>) -> Result<(), ApiError>;
}

/// `AuthApi` over HTTP with reqwest.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = error_message(&body)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "Request failed".to_string());
            debug!("Request failed with {}: {}", status, message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// The `message` field of an error body, when there is one.
fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.send(self.client.post(self.url("/auth/register")).json(request))
            .await
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.send(self.client.post(self.url("/auth/login")).json(request))
            .await
    }

    async fn me(&self, token: &str) -> Result<UserProfile, ApiError> {
        let response: MeResponse = self
            .send(self.client.get(self.url("/auth/me")).bearer_auth(token))
            .await?;
        Ok(response.user)
    }

    async fn logout(&self, token: Option<&str>) -> Result<(), ApiError> {
        let mut request = self.client.post(self.url("/auth/logout"));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let _: LogoutResponse = self.send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_extraction() {
        let body = br#"{"success":false,"message":"Invalid credentials","error":{"error_type":"unauthenticated"}}"#;
        assert_eq!(error_message(body).as_deref(), Some("Invalid credentials"));
        assert_eq!(error_message(b"<html>oops</html>"), None);
        assert_eq!(error_message(br#"{"message":42}"#), None);
    }

    #[test]
    fn test_base_url_is_normalized() {
        let api = HttpAuthApi::with_client(Client::new(), "http://localhost:3000/");
        assert_eq!(api.url("/auth/me"), "http://localhost:3000/auth/me");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_network_error() {
        // Port 9 (discard) is closed on test machines.
        let api = HttpAuthApi::new("http://127.0.0.1:9").unwrap();
        let result = api.me("token").await;
        assert!(matches!(result, Err(ApiError::Network(_))));
    }
}
