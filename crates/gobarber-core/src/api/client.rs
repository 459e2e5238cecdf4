//! API client for the GoBarber REST backend.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::models::{Credentials, NewUser, User};

use super::{ApiError, SessionApi, SessionResponse};

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the GoBarber backend.
///
/// Clones share the connection pool and the attached token, so attaching a
/// token through any clone affects them all.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Create a new API client for the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Currently attached bearer token
    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = self.token() {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::InvalidResponse("token is not a valid header value".to_string()))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, ApiError> {
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {}: {}", what, e)))
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "POST");
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Self::decode(response, path).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Self::decode(response, path).await
    }

    /// Authenticate and return the issued token and user
    pub async fn create_session(&self, credentials: &Credentials) -> Result<SessionResponse, ApiError> {
        let result: Result<SessionResponse, ApiError> = self.post("sessions", credentials).await;
        if let Err(ref e) = result {
            warn!(error = %e, "Session request failed");
        }
        result
    }

    /// Register a new account
    pub async fn create_user(&self, new_user: &NewUser) -> Result<User, ApiError> {
        self.post("users", new_user).await
    }

    /// Fetch the signed-in user's profile. Requires an attached token.
    pub async fn profile(&self) -> Result<User, ApiError> {
        self.get("profile").await
    }
}

#[async_trait]
impl SessionApi for ApiClient {
    async fn create_session(&self, credentials: &Credentials) -> Result<SessionResponse, ApiError> {
        ApiClient::create_session(self, credentials).await
    }

    fn set_token(&self, token: Option<&str>) {
        match self.token.write() {
            Ok(mut slot) => *slot = token.map(str::to_string),
            Err(_) => warn!("Token lock poisoned, token not updated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_create_session_posts_email_and_password() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sessions"))
            .and(body_json(json!({"email": "a@b.com", "password": "123456"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "tok1",
                "user": {"id": "u1", "name": "Ana", "email": "a@b.com"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let response = client
            .create_session(&Credentials::new("a@b.com", "123456"))
            .await
            .unwrap();
        assert_eq!(response.token, "tok1");
        assert_eq!(response.user.name, "Ana");
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_invalid_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sessions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "status": "error",
                "message": "Incorrect email/password combination."
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let err = client
            .create_session(&Credentials::new("a@b.com", "wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_attached_token_is_sent_as_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profile"))
            .and(header("authorization", "Bearer tok1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Ana"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/profile"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = ApiClient::new(format!("{}/", server.uri())).unwrap();
        assert!(client.profile().await.is_err());

        client.set_token(Some("tok1"));
        assert_eq!(client.clone().token().as_deref(), Some("tok1"));
        assert_eq!(client.profile().await.unwrap().name, "Ana");

        client.set_token(None);
        assert!(client.token().is_none());
        assert!(client.profile().await.is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:3333/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3333");
        assert_eq!(client.url("/sessions"), "http://localhost:3333/sessions");
    }

    #[tokio::test]
    async fn test_create_user_rejected_with_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": "error",
                "message": "Email address already used."
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let err = client
            .create_user(&NewUser {
                name: "Ana".to_string(),
                email: "a@b.com".to_string(),
                password: "123456".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Request rejected: Email address already used.");
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"token\": 5}"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let err = client
            .create_session(&Credentials::new("a@b.com", "123456"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }
}
