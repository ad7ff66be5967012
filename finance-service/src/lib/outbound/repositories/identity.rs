use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::DisplayName;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::NewIdentity;
use crate::domain::identity::models::PasswordCredential;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::IdentityRepository;

pub struct PostgresIdentityRepository {
    pool: PgPool,
}

impl PostgresIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct IdentityRow {
    id: i64,
    name: String,
    username: String,
    email: String,
    password: String,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = IdentityError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        Ok(Identity {
            id: IdentityId(row.id),
            name: DisplayName::new(row.name)?,
            username: Username::new(row.username)?,
            email: EmailAddress::new(row.email)?,
            credential: PasswordCredential::from_stored(row.password),
        })
    }
}

/// Map a write failure, translating unique index violations into conflicts.
fn write_error(e: sqlx::Error, username: &Username, email: &EmailAddress) -> IdentityError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if db_err.constraint() == Some("users_username_key") {
                return IdentityError::UsernameAlreadyExists(username.to_string());
            }
            if db_err.constraint() == Some("users_email_key") {
                return IdentityError::EmailAlreadyExists(email.to_string());
            }
        }
    }
    IdentityError::DatabaseError(e.to_string())
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn create(&self, identity: NewIdentity) -> Result<Identity, IdentityError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (name, username, email, password)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(identity.name.as_str())
        .bind(identity.username.as_str())
        .bind(identity.email.as_str())
        .bind(identity.credential.as_stored())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, &identity.username, &identity.email))?;

        Ok(identity.with_id(IdentityId(id)))
    }

    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, IdentityError> {
        sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, name, username, email, password
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IdentityError::DatabaseError(e.to_string()))?
        .map(Identity::try_from)
        .transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, IdentityError> {
        sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, name, username, email, password
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IdentityError::DatabaseError(e.to_string()))?
        .map(Identity::try_from)
        .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, IdentityError> {
        sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, name, username, email, password
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IdentityError::DatabaseError(e.to_string()))?
        .map(Identity::try_from)
        .transpose()
    }

    async fn update(&self, identity: Identity) -> Result<Identity, IdentityError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, username = $3, email = $4, password = $5
            WHERE id = $1
            "#,
        )
        .bind(identity.id.value())
        .bind(identity.name.as_str())
        .bind(identity.username.as_str())
        .bind(identity.email.as_str())
        .bind(identity.credential.as_stored())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &identity.username, &identity.email))?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::NotFound(identity.id.value()));
        }

        Ok(identity)
    }
}
