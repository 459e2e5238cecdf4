use serde::{Deserialize, Serialize};

use crate::models::User;

/// Store key holding the session token
pub const TOKEN_KEY: &str = "@Gobarber:token";

/// Store key holding the JSON-encoded user record
pub const USER_KEY: &str = "@Gobarber:user";

/// A signed-in identity. Token and user are always set together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }
}

/// Published authentication state.
///
/// `Loading` lasts from process start until the stored session has been read
/// once; consumers must treat it as "unknown", not as signed out.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthState {
    #[default]
    Loading,
    Anonymous,
    Authenticated(Session),
}

impl AuthState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.session().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session().map(|s| s.token.as_str())
    }
}
