use thiserror::Error;

use crate::domain::identity::errors::IdentityError;

/// Failure exits of the federated login flow
#[derive(Debug, Clone, Error)]
pub enum FederationError {
    #[error("Invalid state")]
    InvalidState,

    #[error("Failed to exchange code: {0}")]
    TokenExchange(String),

    #[error("Failed to fetch user info: {0}")]
    UserInfo(String),

    #[error("Failed to resolve identity: {0}")]
    Identity(#[from] IdentityError),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),
}
