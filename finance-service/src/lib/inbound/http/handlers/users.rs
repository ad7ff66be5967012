use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::identity::errors::IdentityError;
use crate::identity::models::EmailAddress;
use crate::identity::models::Identity;
use crate::identity::models::IdentityId;
use crate::identity::models::Username;
use crate::inbound::http::middleware::AuthenticatedIdentity;
use crate::inbound::http::router::AppState;

/// Resolve the path identity, allowing access only to the caller's own.
fn authorize(caller: &AuthenticatedIdentity, id: &str) -> Result<IdentityId, ApiError> {
    let id = id
        .parse::<i64>()
        .map(IdentityId)
        .map_err(|_| ApiError::BadRequest("Invalid user ID".to_string()))?;

    if id != caller.identity_id {
        tracing::warn!(
            identity_id = %caller.identity_id,
            target_id = %id,
            "Access to another identity denied"
        );
        return Err(ApiError::Forbidden("Access denied".to_string()));
    }

    Ok(id)
}

/// Identity as exposed over HTTP. The credential is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: i64,
    pub full_name: String,
    pub username: String,
    pub email: String,
}

impl From<&Identity> for UserData {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.value(),
            full_name: identity.name.as_str().to_string(),
            username: identity.username.as_str().to_string(),
            email: identity.email.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserUpdatedData {
    pub message: String,
    pub user: UserData,
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedIdentity>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let id = authorize(&caller, &id)?;

    state
        .identity_service
        .get_identity(&id)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::OK, identity.into()))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUsernameRequest {
    username: String,
}

pub async fn update_username(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedIdentity>,
    Path(id): Path<String>,
    body: Result<Json<UpdateUsernameRequest>, JsonRejection>,
) -> Result<ApiSuccess<UserUpdatedData>, ApiError> {
    let id = authorize(&caller, &id)?;
    let Json(body) = body?;
    let username = Username::new(body.username).map_err(IdentityError::from)?;

    state
        .identity_service
        .update_username(&id, username)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| {
            ApiSuccess::new(
                StatusCode::OK,
                UserUpdatedData {
                    message: "Username updated successfully".to_string(),
                    user: identity.into(),
                },
            )
        })
}

#[derive(Debug, Deserialize)]
pub struct UpdateEmailRequest {
    email: String,
}

pub async fn update_email(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedIdentity>,
    Path(id): Path<String>,
    body: Result<Json<UpdateEmailRequest>, JsonRejection>,
) -> Result<ApiSuccess<UserUpdatedData>, ApiError> {
    let id = authorize(&caller, &id)?;
    let Json(body) = body?;
    let email = EmailAddress::new(body.email).map_err(IdentityError::from)?;

    state
        .identity_service
        .update_email(&id, email)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| {
            ApiSuccess::new(
                StatusCode::OK,
                UserUpdatedData {
                    message: "Email updated successfully".to_string(),
                    user: identity.into(),
                },
            )
        })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    current_password: String,
    new_password: String,
}

pub async fn update_password(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedIdentity>,
    Path(id): Path<String>,
    body: Result<Json<UpdatePasswordRequest>, JsonRejection>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let id = authorize(&caller, &id)?;
    let Json(body) = body?;

    state
        .identity_service
        .update_password(&id, body.current_password, body.new_password)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("Password updated successfully")))
}
