//! Core library for the GoBarber client.
//!
//! - `auth`: session lifecycle (`SessionManager`) and the published `AuthContext`
//! - `api`: HTTP client for the GoBarber backend
//! - `store`: persistent key/value storage backends
//! - `models`: user records, credentials and form validation
//! - `config`: application configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod store;

pub use api::{ApiClient, ApiError, SessionApi};
pub use auth::{AuthContext, AuthError, AuthProvider, AuthState, Session, SessionManager};
pub use config::{Config, StoreKind};
pub use models::{Credentials, NewUser, User, ValidationErrors};
pub use store::{FileStore, KeyValueStore, KeyringStore, MemoryStore, StoreError};
