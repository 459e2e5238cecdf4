//! Authentication module: the session lifecycle and its published context.
//!
//! This module provides:
//! - `SessionManager`: restores, creates and clears the persisted session
//! - `AuthContext`: cloneable read/act handle handed to the presentation layer
//! - `AuthProvider`: owns the startup restore task for the application root
//!
//! The session is persisted as two store entries written and cleared together.

pub mod context;
pub mod error;
pub mod manager;
pub mod session;

pub use context::{AuthContext, AuthProvider};
pub use error::AuthError;
pub use manager::SessionManager;
pub use session::{AuthState, Session, TOKEN_KEY, USER_KEY};
