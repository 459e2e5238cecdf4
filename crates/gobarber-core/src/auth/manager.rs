//! Session lifecycle: restore at startup, sign in, sign out.
//!
//! The manager is the only writer of both the persisted session entries and
//! the published `AuthState`. Every state change is persisted before it is
//! published, so after a crash the stored copy is what the next start sees.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::api::SessionApi;
use crate::models::{Credentials, User};
use crate::store::KeyValueStore;

use super::{AuthError, AuthState, Session, TOKEN_KEY, USER_KEY};

pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    api: Arc<dyn SessionApi>,
    state: watch::Sender<AuthState>,
    // Serializes session mutations; racing sign-in/sign-out calls apply one at a time.
    mutation: Mutex<()>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn KeyValueStore>, api: Arc<dyn SessionApi>) -> Self {
        let (state, _) = watch::channel(AuthState::Loading);
        Self {
            store,
            api,
            state,
            mutation: Mutex::new(()),
        }
    }

    /// Snapshot of the last published state
    pub fn current(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Receiver notified on every published change
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    fn publish(&self, next: AuthState) {
        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    /// Restore the persisted session and clear the loading flag.
    ///
    /// Never fails: unreadable or corrupt storage resolves to `Anonymous`.
    /// Does nothing once the state has left `Loading`.
    pub async fn initialize(&self) {
        let _guard = self.mutation.lock().await;
        if !self.is_loading() {
            debug!("Session already resolved, skipping restore");
            return;
        }

        match self.load_stored().await {
            Ok(Some(session)) => {
                info!(user = %session.user.name, "Restored stored session");
                self.api.set_token(Some(&session.token));
                self.publish(AuthState::Authenticated(session));
            }
            Ok(None) => {
                debug!("No stored session");
                self.publish(AuthState::Anonymous);
            }
            Err(e) => {
                warn!(error = %e, "Ignoring unusable stored session");
                self.publish(AuthState::Anonymous);
            }
        }
    }

    async fn load_stored(&self) -> Result<Option<Session>, AuthError> {
        let mut values = self
            .store
            .get_many(&[TOKEN_KEY, USER_KEY])
            .await
            .map_err(AuthError::StorageRead)?
            .into_iter();

        let token = values.next().flatten().filter(|t| !t.is_empty());
        let user = values.next().flatten().filter(|u| !u.is_empty());

        match (token, user) {
            (Some(token), Some(user)) => {
                let user: User = serde_json::from_str(&user).map_err(AuthError::StorageCorruption)?;
                Ok(Some(Session::new(token, user)))
            }
            _ => Ok(None),
        }
    }

    /// Authenticate against the backend, persist the session, then publish it.
    ///
    /// Errors propagate unchanged and leave the published state untouched.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let _guard = self.mutation.lock().await;

        let response = self.api.create_session(credentials).await?;
        let session = Session::new(response.token, response.user);

        let user_json = serde_json::to_string(&session.user)
            .map_err(|e| AuthError::StorageWrite(e.into()))?;
        self.store
            .set_many(&[(TOKEN_KEY, session.token.as_str()), (USER_KEY, user_json.as_str())])
            .await
            .map_err(AuthError::StorageWrite)?;

        self.api.set_token(Some(&session.token));
        self.publish(AuthState::Authenticated(session.clone()));
        info!(user = %session.user.name, "Signed in");
        Ok(session)
    }

    /// Remove the persisted session, then publish `Anonymous`. Idempotent.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let _guard = self.mutation.lock().await;

        self.store
            .delete_many(&[TOKEN_KEY, USER_KEY])
            .await
            .map_err(AuthError::StorageWrite)?;

        self.api.set_token(None);
        self.publish(AuthState::Anonymous);
        info!("Signed out");
        Ok(())
    }
}
