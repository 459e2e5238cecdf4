use thiserror::Error;

use crate::api::ApiError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to read stored session: {0}")]
    StorageRead(#[source] StoreError),

    #[error("Stored user record is corrupt: {0}")]
    StorageCorruption(#[source] serde_json::Error),

    #[error("Failed to persist session: {0}")]
    StorageWrite(#[source] StoreError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AuthError {
    /// True when the backend rejected the email/password pair
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, AuthError::Api(ApiError::InvalidCredentials))
    }

    /// True for transport-level failures reaching the backend
    pub fn is_network(&self) -> bool {
        matches!(self, AuthError::Api(ApiError::Network(_)))
    }
}
