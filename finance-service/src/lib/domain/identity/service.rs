use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;

use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::FederatedProfile;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::LoginOutcome;
use crate::domain::identity::models::NewIdentity;
use crate::domain::identity::models::PasswordCredential;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::IdentityRepository;
use crate::domain::identity::ports::IdentityServicePort;

/// Domain service implementation for registration, login and profile
/// maintenance.
pub struct IdentityService<IR>
where
    IR: IdentityRepository,
{
    repository: Arc<IR>,
    authenticator: Arc<Authenticator>,
}

impl<IR> IdentityService<IR>
where
    IR: IdentityRepository,
{
    /// Create a new identity service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity persistence implementation
    /// * `authenticator` - Password hashing and session token issuance
    pub fn new(repository: Arc<IR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    async fn load(&self, id: &IdentityId) -> Result<Identity, IdentityError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::NotFound(id.value()))
    }

    fn hash_password(&self, password: &str) -> Result<PasswordCredential, IdentityError> {
        if password.is_empty() {
            return Err(IdentityError::EmptyPassword);
        }

        self.authenticator
            .hash_password(password)
            .map(PasswordCredential::Hashed)
            .map_err(|e| IdentityError::Hashing(e.to_string()))
    }
}

#[async_trait]
impl<IR> IdentityServicePort for IdentityService<IR>
where
    IR: IdentityRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<Identity, IdentityError> {
        if command.password.is_empty() {
            return Err(IdentityError::EmptyPassword);
        }

        // Early exits only; the storage unique indexes remain authoritative.
        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(IdentityError::UsernameAlreadyExists(
                command.username.to_string(),
            ));
        }

        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(IdentityError::EmailAlreadyExists(command.email.to_string()));
        }

        let credential = self.hash_password(&command.password)?;

        let identity = self
            .repository
            .create(NewIdentity {
                name: command.name,
                username: command.username,
                email: command.email,
                credential,
            })
            .await?;

        tracing::info!(identity_id = %identity.id, "Identity registered");

        Ok(identity)
    }

    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, IdentityError> {
        let Some(identity) = self.repository.find_by_email(&command.email).await? else {
            tracing::warn!("Login rejected: unknown email");
            return Err(IdentityError::InvalidCredentials);
        };

        let Some(stored_hash) = identity.credential.hash() else {
            tracing::warn!(
                identity_id = %identity.id,
                "Login rejected: identity has no local password"
            );
            return Err(IdentityError::InvalidCredentials);
        };

        let result = self
            .authenticator
            .authenticate(
                &command.password,
                stored_hash,
                identity.email.as_str(),
                identity.id.value(),
            )
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::warn!(identity_id = %identity.id, "Login rejected: wrong password");
                    IdentityError::InvalidCredentials
                }
                AuthenticationError::JwtError(err) => IdentityError::TokenIssuance(err.to_string()),
            })?;

        tracing::info!(identity_id = %identity.id, "Identity logged in");

        Ok(LoginOutcome {
            identity,
            token: result.access_token,
        })
    }

    async fn get_identity(&self, id: &IdentityId) -> Result<Identity, IdentityError> {
        self.load(id).await
    }

    async fn update_username(
        &self,
        id: &IdentityId,
        username: Username,
    ) -> Result<Identity, IdentityError> {
        let mut identity = self.load(id).await?;

        if let Some(other) = self.repository.find_by_username(&username).await? {
            if other.id != identity.id {
                return Err(IdentityError::UsernameAlreadyExists(username.to_string()));
            }
        }

        identity.username = username;
        self.repository.update(identity).await
    }

    async fn update_email(
        &self,
        id: &IdentityId,
        email: EmailAddress,
    ) -> Result<Identity, IdentityError> {
        let mut identity = self.load(id).await?;

        if let Some(other) = self.repository.find_by_email(email.as_str()).await? {
            if other.id != identity.id {
                return Err(IdentityError::EmailAlreadyExists(email.to_string()));
            }
        }

        identity.email = email;
        self.repository.update(identity).await
    }

    async fn update_password(
        &self,
        id: &IdentityId,
        current_password: String,
        new_password: String,
    ) -> Result<(), IdentityError> {
        let mut identity = self.load(id).await?;

        let verified = identity
            .credential
            .hash()
            .is_some_and(|hash| self.authenticator.verify_password(hash, &current_password));
        if !verified {
            tracing::warn!(identity_id = %identity.id, "Password change rejected");
            return Err(IdentityError::IncorrectCurrentPassword);
        }

        identity.credential = self.hash_password(&new_password)?;
        self.repository.update(identity).await?;

        Ok(())
    }

    async fn find_or_provision(
        &self,
        profile: FederatedProfile,
    ) -> Result<Identity, IdentityError> {
        if let Some(identity) = self
            .repository
            .find_by_email(profile.email.as_str())
            .await?
        {
            return Ok(identity);
        }

        let username = Username::from_email(&profile.email)?;
        let identity = self
            .repository
            .create(NewIdentity {
                name: profile.name,
                username,
                email: profile.email,
                credential: PasswordCredential::FederatedOnly,
            })
            .await?;

        tracing::info!(identity_id = %identity.id, "Federated identity provisioned");

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::domain::identity::models::DisplayName;

    mock! {
        pub TestIdentityRepository {}

        #[async_trait]
        impl IdentityRepository for TestIdentityRepository {
            async fn create(&self, identity: NewIdentity) -> Result<Identity, IdentityError>;
            async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, IdentityError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<Identity>, IdentityError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, IdentityError>;
            async fn update(&self, identity: Identity) -> Result<Identity, IdentityError>;
        }
    }

    const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(SECRET).unwrap())
    }

    fn identity(id: i64, username: &str, email: &str, credential: PasswordCredential) -> Identity {
        Identity {
            id: IdentityId(id),
            name: DisplayName::new("Test".to_string()).unwrap(),
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            credential,
        }
    }

    fn register_command(username: &str, email: &str, password: &str) -> RegisterCommand {
        RegisterCommand::new(
            DisplayName::new("Test".to_string()).unwrap(),
            Username::new(username.to_string()).unwrap(),
            EmailAddress::new(email.to_string()).unwrap(),
            password.to_string(),
        )
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestIdentityRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|identity| {
                identity.username.as_str() == "user1"
                    && identity.email.as_str() == "u1@example.com"
                    && identity
                        .credential
                        .hash()
                        .is_some_and(|hash| hash.starts_with("$argon2"))
            })
            .times(1)
            .returning(|identity| Ok(identity.with_id(IdentityId(1))));

        let service = IdentityService::new(Arc::new(repository), authenticator());

        let identity = service
            .register(register_command("user1", "u1@example.com", "pass"))
            .await
            .unwrap();

        assert_eq!(identity.id, IdentityId(1));
        assert_eq!(identity.name.as_str(), "Test");
        assert_ne!(identity.credential.as_stored(), "pass");
    }

    #[tokio::test]
    async fn test_register_duplicate_username_writes_nothing() {
        let mut repository = MockTestIdentityRepository::new();

        repository.expect_find_by_username().times(1).returning(|_| {
            Ok(Some(identity(
                1,
                "user1",
                "u1@example.com",
                PasswordCredential::FederatedOnly,
            )))
        });
        repository.expect_find_by_email().times(0);
        repository.expect_create().times(0);

        let service = IdentityService::new(Arc::new(repository), authenticator());

        let result = service
            .register(register_command("user1", "other@example.com", "pass"))
            .await;

        assert!(matches!(
            result,
            Err(IdentityError::UsernameAlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut repository = MockTestIdentityRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_find_by_email().times(1).returning(|_| {
            Ok(Some(identity(
                1,
                "user1",
                "u1@example.com",
                PasswordCredential::FederatedOnly,
            )))
        });
        repository.expect_create().times(0);

        let service = IdentityService::new(Arc::new(repository), authenticator());

        let result = service
            .register(register_command("user2", "u1@example.com", "pass"))
            .await;

        assert!(matches!(result, Err(IdentityError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_storage_unique_violation() {
        let mut repository = MockTestIdentityRepository::new();

        repository
            .expect_find_by_username()
            .returning(|_| Ok(None));
        repository.expect_find_by_email().returning(|_| Ok(None));
        repository.expect_create().times(1).returning(|identity| {
            Err(IdentityError::UsernameAlreadyExists(
                identity.username.to_string(),
            ))
        });

        let service = IdentityService::new(Arc::new(repository), authenticator());

        let result = service
            .register(register_command("user1", "u1@example.com", "pass"))
            .await;

        assert!(matches!(
            result,
            Err(IdentityError::UsernameAlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_register_empty_password() {
        let mut repository = MockTestIdentityRepository::new();
        repository.expect_create().times(0);

        let service = IdentityService::new(Arc::new(repository), authenticator());

        let result = service
            .register(register_command("user1", "u1@example.com", ""))
            .await;

        assert!(matches!(result, Err(IdentityError::EmptyPassword)));
    }

    #[tokio::test]
    async fn test_login_success_issues_token() {
        let authenticator = authenticator();
        let hash = authenticator.hash_password("pass").unwrap();

        let mut repository = MockTestIdentityRepository::new();
        repository
            .expect_find_by_email()
            .withf(|email| email == "u1@example.com")
            .times(1)
            .returning(move |_| {
                Ok(Some(identity(
                    7,
                    "user1",
                    "u1@example.com",
                    PasswordCredential::Hashed(hash.clone()),
                )))
            });

        let service = IdentityService::new(Arc::new(repository), Arc::clone(&authenticator));

        let outcome = service
            .login(LoginCommand {
                email: "u1@example.com".to_string(),
                password: "pass".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(outcome.identity.id, IdentityId(7));

        let claims = authenticator.validate_token(&outcome.token).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.email, "u1@example.com");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let authenticator = authenticator();
        let hash = authenticator.hash_password("pass").unwrap();

        let mut repository = MockTestIdentityRepository::new();
        repository.expect_find_by_email().returning(move |_| {
            Ok(Some(identity(
                7,
                "user1",
                "u1@example.com",
                PasswordCredential::Hashed(hash.clone()),
            )))
        });

        let service = IdentityService::new(Arc::new(repository), authenticator);

        let result = service
            .login(LoginCommand {
                email: "u1@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;

        assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut repository = MockTestIdentityRepository::new();
        repository.expect_find_by_email().returning(|_| Ok(None));

        let service = IdentityService::new(Arc::new(repository), authenticator());

        let result = service
            .login(LoginCommand {
                email: "nobody@example.com".to_string(),
                password: "pass".to_string(),
            })
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, IdentityError::InvalidCredentials));
        assert_eq!(err.to_string(), "Invalid email or password");
    }

    #[tokio::test]
    async fn test_login_federated_identity_has_no_password() {
        let mut repository = MockTestIdentityRepository::new();
        repository.expect_find_by_email().returning(|_| {
            Ok(Some(identity(
                3,
                "jane",
                "jane@example.com",
                PasswordCredential::FederatedOnly,
            )))
        });

        let service = IdentityService::new(Arc::new(repository), authenticator());

        let result = service
            .login(LoginCommand {
                email: "jane@example.com".to_string(),
                password: PasswordCredential::FEDERATED_SENTINEL.to_string(),
            })
            .await;

        assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_find_or_provision_existing_identity() {
        let mut repository = MockTestIdentityRepository::new();
        repository.expect_find_by_email().times(1).returning(|_| {
            Ok(Some(identity(
                5,
                "custom",
                "jane@example.com",
                PasswordCredential::FederatedOnly,
            )))
        });
        repository.expect_create().times(0);

        let service = IdentityService::new(Arc::new(repository), authenticator());

        let identity = service
            .find_or_provision(FederatedProfile {
                name: DisplayName::new("Jane Doe".to_string()).unwrap(),
                email: EmailAddress::new("jane@example.com".to_string()).unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(identity.id, IdentityId(5));
        assert_eq!(identity.username.as_str(), "custom");
    }

    #[tokio::test]
    async fn test_find_or_provision_creates_federated_identity() {
        let mut repository = MockTestIdentityRepository::new();
        repository.expect_find_by_email().returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|identity| {
                identity.username.as_str() == "jane.doe"
                    && identity.name.as_str() == "Jane Doe"
                    && identity.credential == PasswordCredential::FederatedOnly
            })
            .times(1)
            .returning(|identity| Ok(identity.with_id(IdentityId(9))));

        let service = IdentityService::new(Arc::new(repository), authenticator());

        let identity = service
            .find_or_provision(FederatedProfile {
                name: DisplayName::new("Jane Doe".to_string()).unwrap(),
                email: EmailAddress::new("jane.doe@example.com".to_string()).unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(identity.id, IdentityId(9));
    }

    #[tokio::test]
    async fn test_update_username_taken_by_other() {
        let mut repository = MockTestIdentityRepository::new();
        repository.expect_find_by_id().returning(|_| {
            Ok(Some(identity(
                1,
                "user1",
                "u1@example.com",
                PasswordCredential::FederatedOnly,
            )))
        });
        repository.expect_find_by_username().returning(|_| {
            Ok(Some(identity(
                2,
                "user2",
                "u2@example.com",
                PasswordCredential::FederatedOnly,
            )))
        });
        repository.expect_update().times(0);

        let service = IdentityService::new(Arc::new(repository), authenticator());

        let result = service
            .update_username(&IdentityId(1), Username::new("user2".to_string()).unwrap())
            .await;

        assert!(matches!(
            result,
            Err(IdentityError::UsernameAlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_update_email_success() {
        let mut repository = MockTestIdentityRepository::new();
        repository.expect_find_by_id().returning(|_| {
            Ok(Some(identity(
                1,
                "user1",
                "u1@example.com",
                PasswordCredential::FederatedOnly,
            )))
        });
        repository.expect_find_by_email().returning(|_| Ok(None));
        repository
            .expect_update()
            .withf(|identity| identity.email.as_str() == "new@example.com")
            .times(1)
            .returning(|identity| Ok(identity));

        let service = IdentityService::new(Arc::new(repository), authenticator());

        let identity = service
            .update_email(
                &IdentityId(1),
                EmailAddress::new("new@example.com".to_string()).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(identity.email.as_str(), "new@example.com");
    }

    #[tokio::test]
    async fn test_update_password_rotates_hash() {
        let authenticator = authenticator();
        let hash = authenticator.hash_password("old").unwrap();
        let verifier = Arc::clone(&authenticator);

        let mut repository = MockTestIdentityRepository::new();
        repository.expect_find_by_id().returning(move |_| {
            Ok(Some(identity(
                1,
                "user1",
                "u1@example.com",
                PasswordCredential::Hashed(hash.clone()),
            )))
        });
        repository
            .expect_update()
            .withf(move |identity| {
                identity
                    .credential
                    .hash()
                    .is_some_and(|hash| verifier.verify_password(hash, "new"))
            })
            .times(1)
            .returning(|identity| Ok(identity));

        let service = IdentityService::new(Arc::new(repository), authenticator);

        service
            .update_password(&IdentityId(1), "old".to_string(), "new".to_string())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_password_wrong_current() {
        let authenticator = authenticator();
        let hash = authenticator.hash_password("old").unwrap();

        let mut repository = MockTestIdentityRepository::new();
        repository.expect_find_by_id().returning(move |_| {
            Ok(Some(identity(
                1,
                "user1",
                "u1@example.com",
                PasswordCredential::Hashed(hash.clone()),
            )))
        });
        repository.expect_update().times(0);

        let service = IdentityService::new(Arc::new(repository), authenticator);

        let result = service
            .update_password(&IdentityId(1), "bad".to_string(), "new".to_string())
            .await;

        assert!(matches!(
            result,
            Err(IdentityError::IncorrectCurrentPassword)
        ));
    }

    #[tokio::test]
    async fn test_get_identity_not_found() {
        let mut repository = MockTestIdentityRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));

        let service = IdentityService::new(Arc::new(repository), authenticator());

        let result = service.get_identity(&IdentityId(99)).await;
        assert!(matches!(result, Err(IdentityError::NotFound(99))));
    }
}
