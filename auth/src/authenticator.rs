use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and session
/// token issuance.
///
/// Holds the process-wide signing secret; built once at startup and shared
/// read-only between request handlers.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_validity: Duration,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// Signed session token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    pub const DEFAULT_TOKEN_VALIDITY_HOURS: i64 = 24;

    /// Create a new authenticator issuing tokens valid for 24 hours.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    ///
    /// # Errors
    /// * `MissingSecret` - Secret is empty
    pub fn new(jwt_secret: &[u8]) -> Result<Self, JwtError> {
        Self::with_validity(
            jwt_secret,
            Duration::hours(Self::DEFAULT_TOKEN_VALIDITY_HOURS),
        )
    }

    /// Create a new authenticator with a custom token validity window.
    pub fn with_validity(jwt_secret: &[u8], token_validity: Duration) -> Result<Self, JwtError> {
        Ok(Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret)?,
            token_validity,
        })
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    pub fn verify_password(&self, stored_hash: &str, password: &str) -> bool {
        self.password_hasher.verify(stored_hash, password)
    }

    /// Verify credentials and issue a session token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `email` - Subject email for the token
    /// * `user_id` - Subject identifier for the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        email: &str,
        user_id: i64,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.verify_password(stored_hash, password) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.issue_token(email, user_id)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Issue a session token without password verification.
    ///
    /// Used once the caller has been authenticated by other means, such as
    /// a federated login callback.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(&self, email: &str, user_id: i64) -> Result<String, JwtError> {
        let claims = Claims::new(email, user_id, Utc::now(), self.token_validity);
        self.jwt_handler.encode(&claims)
    }

    /// Validate a session token and return its claims.
    ///
    /// # Errors
    /// * `JwtError` - Signature, structure or expiry check failed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
