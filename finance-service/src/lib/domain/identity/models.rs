use std::fmt;
use std::str::FromStr;

use crate::domain::identity::errors::DisplayNameError;
use crate::domain::identity::errors::EmailError;
use crate::domain::identity::errors::UsernameError;

/// Identity aggregate entity.
///
/// Represents a registered user, local or federated.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: IdentityId,
    pub name: DisplayName,
    pub username: Username,
    pub email: EmailAddress,
    pub credential: PasswordCredential,
}

/// Identity data before storage assigns an identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIdentity {
    pub name: DisplayName,
    pub username: Username,
    pub email: EmailAddress,
    pub credential: PasswordCredential,
}

impl NewIdentity {
    /// Attach the identifier assigned by storage.
    pub fn with_id(self, id: IdentityId) -> Identity {
        Identity {
            id,
            name: self.name,
            username: self.username,
            email: self.email,
            credential: self.credential,
        }
    }
}

/// Identity unique identifier, assigned by storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityId(pub i64);

impl IdentityId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stored password credential.
///
/// Federated identities have no local password; their credential never
/// verifies against any plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordCredential {
    Hashed(String),
    FederatedOnly,
}

impl PasswordCredential {
    /// Storage value marking a federated-only identity.
    pub const FEDERATED_SENTINEL: &'static str = "google-oauth";

    /// Rebuild a credential from its stored column value.
    pub fn from_stored(value: String) -> Self {
        if value == Self::FEDERATED_SENTINEL {
            Self::FederatedOnly
        } else {
            Self::Hashed(value)
        }
    }

    /// Column value to persist.
    pub fn as_stored(&self) -> &str {
        match self {
            Self::Hashed(hash) => hash,
            Self::FederatedOnly => Self::FEDERATED_SENTINEL,
        }
    }

    /// Local password hash, if any.
    pub fn hash(&self) -> Option<&str> {
        match self {
            Self::Hashed(hash) => Some(hash),
            Self::FederatedOnly => None,
        }
    }
}

/// Display name value type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(name: String) -> Result<Self, DisplayNameError> {
        if name.trim().is_empty() {
            Err(DisplayNameError::Empty)
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Username value type
///
/// Ensures username is 1-64 characters with no whitespace and no '@'.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MAX_LENGTH: usize = 64;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `Empty` - Username is empty
    /// * `TooLong` - Username longer than 64 characters
    /// * `InvalidCharacters` - Contains whitespace or '@'
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let length = username.chars().count();
        if length == 0 {
            return Err(UsernameError::Empty);
        }
        if length > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if username.chars().any(|c| c.is_whitespace() || c == '@') {
            return Err(UsernameError::InvalidCharacters);
        }
        Ok(Self(username))
    }

    /// Default username for a federated identity: the local part of its email.
    pub fn from_email(email: &EmailAddress) -> Result<Self, UsernameError> {
        Self::new(email.local_part().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part before the last '@'.
    pub fn local_part(&self) -> &str {
        self.0
            .rsplit_once('@')
            .map_or(self.0.as_str(), |(local, _)| local)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to register a new local identity
#[derive(Debug)]
pub struct RegisterCommand {
    pub name: DisplayName,
    pub username: Username,
    pub email: EmailAddress,
    pub password: String,
}

impl RegisterCommand {
    /// Construct a new registration command.
    ///
    /// # Arguments
    /// * `name` - Validated display name
    /// * `username` - Validated username
    /// * `email` - Validated email address
    /// * `password` - Plain text password (will be hashed by service)
    pub fn new(
        name: DisplayName,
        username: Username,
        email: EmailAddress,
        password: String,
    ) -> Self {
        Self {
            name,
            username,
            email,
            password,
        }
    }
}

/// Command to authenticate with local credentials
#[derive(Debug)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// Successful local login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub identity: Identity,
    pub token: String,
}

/// Profile reported by an identity provider after a federated sign-in.
#[derive(Debug, Clone, PartialEq)]
pub struct FederatedProfile {
    pub name: DisplayName,
    pub email: EmailAddress,
}
