//! HTTP client module for the GoBarber backend.
//!
//! `ApiClient` talks to the REST API. Authenticated requests carry the
//! session token as an `Authorization: Bearer` header once one is attached.
//!
//! The session lifecycle only depends on the `SessionApi` seam, so tests can
//! script the backend without a server.

pub mod client;
pub mod error;

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::{Credentials, User};

pub use client::ApiClient;
pub use error::ApiError;

/// Body of a successful `POST /sessions`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
}

/// The part of the backend the session lifecycle depends on.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Exchange credentials for a token and user record.
    async fn create_session(&self, credentials: &Credentials) -> Result<SessionResponse, ApiError>;

    /// Attach (or with `None`, detach) the bearer token sent on later calls.
    fn set_token(&self, token: Option<&str>);
}
