//! The published session context.
//!
//! The application root starts an `AuthProvider`, which owns the startup
//! restore task, and hands `AuthContext` clones to whatever needs session
//! state. Consumers take the context in their constructor, so one cannot be
//! built without it.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::models::{Credentials, User};

use super::{AuthError, AuthState, Session, SessionManager};

/// Cloneable handle to the session manager.
#[derive(Clone)]
pub struct AuthContext {
    manager: Arc<SessionManager>,
}

impl AuthContext {
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self { manager }
    }

    pub fn state(&self) -> AuthState {
        self.manager.current()
    }

    pub fn is_loading(&self) -> bool {
        self.manager.is_loading()
    }

    pub fn user(&self) -> Option<User> {
        self.manager.current().user().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.manager.current().token().map(str::to_string)
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.manager.subscribe()
    }

    /// Wait until the startup restore has resolved, then return the state.
    pub async fn wait_until_loaded(&self) -> AuthState {
        let mut rx = self.manager.subscribe();
        let state = match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            // Sender is owned by the manager held here
            Err(_) => self.manager.current(),
        };
        state
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        self.manager.sign_in(credentials).await
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.manager.sign_out().await
    }
}

/// Owns the session restore task for the lifetime of the application.
pub struct AuthProvider {
    context: AuthContext,
    restore: JoinHandle<()>,
}

impl AuthProvider {
    /// Spawn the stored-session restore on the current runtime and return
    /// immediately.
    pub fn start(manager: SessionManager) -> Self {
        let manager = Arc::new(manager);
        let restore = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.initialize().await })
        };
        debug!("Auth provider started");
        Self {
            context: AuthContext::new(manager),
            restore,
        }
    }

    pub fn context(&self) -> AuthContext {
        self.context.clone()
    }

    /// Wait for the restore task to finish. Restores are not cancelled.
    pub async fn shutdown(self) -> anyhow::Result<()> {
        if let Err(e) = self.restore.await {
            error!(error = %e, "Session restore task failed");
            return Err(anyhow::anyhow!("session restore task failed: {}", e));
        }
        debug!("Auth provider stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::api::{ApiError, SessionApi, SessionResponse};
    use crate::auth::{TOKEN_KEY, USER_KEY};
    use crate::store::{KeyValueStore, MemoryStore};

    struct FixedApi;

    #[async_trait]
    impl SessionApi for FixedApi {
        async fn create_session(&self, credentials: &Credentials) -> Result<SessionResponse, ApiError> {
            if credentials.secret == "123456" {
                Ok(SessionResponse {
                    token: "tok1".to_string(),
                    user: User::named("Ana"),
                })
            } else {
                Err(ApiError::InvalidCredentials)
            }
        }

        fn set_token(&self, _token: Option<&str>) {}
    }

    fn provider(store: Arc<MemoryStore>) -> AuthProvider {
        AuthProvider::start(SessionManager::new(store, Arc::new(FixedApi)))
    }

    #[tokio::test]
    async fn test_empty_store_resolves_anonymous() {
        let provider = provider(Arc::new(MemoryStore::new()));
        let ctx = provider.context();
        assert_eq!(ctx.wait_until_loaded().await, AuthState::Anonymous);
        assert!(!ctx.is_loading());
        assert!(ctx.user().is_none());
        provider.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_restored_session_visible_through_clones() {
        let store = Arc::new(MemoryStore::with_entries([
            (TOKEN_KEY, "tok1"),
            (USER_KEY, r#"{"name":"Ana"}"#),
        ]));
        let provider = provider(store);
        let ctx = provider.context();
        let other = ctx.clone();

        let state = ctx.wait_until_loaded().await;
        assert!(state.is_authenticated());
        assert_eq!(other.user().map(|u| u.name), Some("Ana".to_string()));
        assert_eq!(other.token().as_deref(), Some("tok1"));
        provider.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_wait_until_loaded_from_spawned_consumers() {
        let store = Arc::new(MemoryStore::with_entries([
            (TOKEN_KEY, "tok1"),
            (USER_KEY, r#"{"name":"Ana"}"#),
        ]));
        let provider = provider(store);

        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let ctx = provider.context();
                tokio::spawn(async move { ctx.wait_until_loaded().await })
            })
            .collect();
        for waiter in waiters {
            let state = waiter.await.unwrap();
            assert_eq!(state.token(), Some("tok1"));
        }

        // Already resolved: returns immediately with the same state
        let ctx = provider.context();
        assert!(ctx.wait_until_loaded().await.is_authenticated());
        provider.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_sign_in_and_out_through_context() {
        let store = Arc::new(MemoryStore::new());
        let provider = provider(store.clone());
        let ctx = provider.context();
        ctx.wait_until_loaded().await;

        let err = ctx.sign_in(&Credentials::new("a@b.com", "wrong")).await.unwrap_err();
        assert!(err.is_invalid_credentials());
        assert!(ctx.user().is_none());

        ctx.sign_in(&Credentials::new("a@b.com", "123456")).await.unwrap();
        assert_eq!(ctx.user().map(|u| u.name), Some("Ana".to_string()));
        assert_eq!(store.get(TOKEN_KEY).await.unwrap().as_deref(), Some("tok1"));

        ctx.sign_out().await.unwrap();
        assert!(ctx.user().is_none());
        assert!(store.is_empty());
        provider.shutdown().await.unwrap();
    }
}
