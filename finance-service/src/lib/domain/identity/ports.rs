use async_trait::async_trait;

use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::FederatedProfile;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::LoginOutcome;
use crate::domain::identity::models::NewIdentity;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::Username;

/// Port for identity domain service operations.
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// Register a new local identity.
    ///
    /// # Arguments
    /// * `command` - Validated command containing name, username, email, and password
    ///
    /// # Returns
    /// Created identity
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `EmptyPassword` - Password is empty
    /// * `Hashing` - Password hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Identity, IdentityError>;

    /// Authenticate with email and password and issue a session token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `TokenIssuance` - Token signing failed
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, IdentityError>;

    /// Retrieve identity by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_identity(&self, id: &IdentityId) -> Result<Identity, IdentityError>;

    /// Change the username of an identity.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `UsernameAlreadyExists` - Another identity owns the username
    /// * `DatabaseError` - Database operation failed
    async fn update_username(
        &self,
        id: &IdentityId,
        username: Username,
    ) -> Result<Identity, IdentityError>;

    /// Change the email of an identity.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `EmailAlreadyExists` - Another identity owns the email
    /// * `DatabaseError` - Database operation failed
    async fn update_email(
        &self,
        id: &IdentityId,
        email: EmailAddress,
    ) -> Result<Identity, IdentityError>;

    /// Rotate the local password after checking the current one.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `IncorrectCurrentPassword` - Current password does not verify
    /// * `EmptyPassword` - New password is empty
    /// * `Hashing` - Password hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn update_password(
        &self,
        id: &IdentityId,
        current_password: String,
        new_password: String,
    ) -> Result<(), IdentityError>;

    /// Resolve the local identity for a federated profile, creating one on
    /// first sign-in.
    ///
    /// Existing identities are returned unchanged.
    ///
    /// # Errors
    /// * `InvalidUsername` - Email local part is not a valid username
    /// * `UsernameAlreadyExists` - Derived username is taken by another identity
    /// * `DatabaseError` - Database operation failed
    async fn find_or_provision(&self, profile: FederatedProfile)
        -> Result<Identity, IdentityError>;
}

/// Persistence operations for identity aggregate.
///
/// Implementations must enforce uniqueness of username and email and report
/// violations as `UsernameAlreadyExists` / `EmailAlreadyExists`.
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Persist new identity, returning it with its assigned identifier.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, identity: NewIdentity) -> Result<Identity, IdentityError>;

    /// Retrieve identity by identifier.
    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, IdentityError>;

    /// Retrieve identity by username.
    async fn find_by_username(&self, username: &Username)
        -> Result<Option<Identity>, IdentityError>;

    /// Retrieve identity by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, IdentityError>;

    /// Update existing identity in storage.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `UsernameAlreadyExists` - New username is already taken
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, identity: Identity) -> Result<Identity, IdentityError>;
}
