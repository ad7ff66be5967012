use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::federation::errors::FederationError;
use crate::identity::errors::IdentityError;
use crate::ledger::errors::LedgerError;
use crate::ledger::models::RecordId;

pub mod budgets;
pub mod expenses;
pub mod federated;
pub mod incomes;
pub mod login;
pub mod register;
pub mod users;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Plain `{"message": ...}` acknowledgement body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub message: String,
}

impl MessageData {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        Self::BadRequest("Invalid input".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::NotFound(_) => ApiError::NotFound("User not found".to_string()),
            IdentityError::UsernameAlreadyExists(_) | IdentityError::EmailAlreadyExists(_) => {
                ApiError::Conflict(err.to_string())
            }
            IdentityError::InvalidCredentials | IdentityError::IncorrectCurrentPassword => {
                ApiError::Unauthorized(err.to_string())
            }
            IdentityError::InvalidUsername(_)
            | IdentityError::InvalidEmail(_)
            | IdentityError::InvalidName(_)
            | IdentityError::EmptyPassword => ApiError::BadRequest(err.to_string()),
            IdentityError::Hashing(_)
            | IdentityError::TokenIssuance(_)
            | IdentityError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<FederationError> for ApiError {
    fn from(err: FederationError) -> Self {
        match err {
            FederationError::InvalidState => ApiError::BadRequest("Invalid state".to_string()),
            FederationError::TokenExchange(_) => {
                ApiError::Unauthorized("Failed to exchange code".to_string())
            }
            FederationError::Identity(e) => ApiError::from(e),
            FederationError::UserInfo(_) | FederationError::TokenIssuance(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidAmount(_) | LedgerError::InvalidPeriod { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            LedgerError::NotFound(_) => ApiError::NotFound(err.to_string()),
            LedgerError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

/// Parse a numeric record identifier from a path segment.
pub fn parse_record_id(raw: &str) -> Result<RecordId, ApiError> {
    raw.parse::<i64>()
        .map(RecordId)
        .map_err(|_| ApiError::BadRequest("Invalid record ID".to_string()))
}

/// Answer 404 for an empty collection, 200 with the items otherwise.
pub fn non_empty<T, D>(items: Vec<T>, empty_message: &str) -> Result<ApiSuccess<Vec<D>>, ApiError>
where
    D: for<'a> From<&'a T> + Serialize + PartialEq,
{
    if items.is_empty() {
        return Err(ApiError::NotFound(empty_message.to_string()));
    }
    Ok(ApiSuccess::new(
        StatusCode::OK,
        items.iter().map(D::from).collect(),
    ))
}
