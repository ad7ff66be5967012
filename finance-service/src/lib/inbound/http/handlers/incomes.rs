use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::non_empty;
use super::parse_record_id;
use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::inbound::http::middleware::AuthenticatedIdentity;
use crate::inbound::http::router::AppState;
use crate::ledger::errors::LedgerError;
use crate::ledger::models::Amount;
use crate::ledger::models::Income;
use crate::ledger::models::NewIncome;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateIncomeRequest {
    amount: f64,
    category: String,
    #[serde(default)]
    description: String,
    date: NaiveDate,
}

impl CreateIncomeRequest {
    fn try_into_new_income(self) -> Result<NewIncome, LedgerError> {
        Ok(NewIncome {
            amount: Amount::new(self.amount)?,
            category: self.category,
            description: self.description,
            date: self.date,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeData {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<&Income> for IncomeData {
    fn from(income: &Income) -> Self {
        Self {
            id: income.id.0,
            user_id: income.owner.value(),
            amount: income.amount.value(),
            category: income.category.clone(),
            description: income.description.clone(),
            date: income.date,
            created_at: income.created_at,
        }
    }
}

pub async fn create_income(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedIdentity>,
    body: Result<Json<CreateIncomeRequest>, JsonRejection>,
) -> Result<ApiSuccess<IncomeData>, ApiError> {
    let Json(body) = body?;

    state
        .ledger_service
        .add_income(&caller.identity_id, body.try_into_new_income()?)
        .await
        .map_err(ApiError::from)
        .map(|ref income| ApiSuccess::new(StatusCode::OK, income.into()))
}

pub async fn list_incomes(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedIdentity>,
) -> Result<ApiSuccess<Vec<IncomeData>>, ApiError> {
    let incomes = state
        .ledger_service
        .list_incomes(&caller.identity_id)
        .await?;

    non_empty(incomes, "No incomes found")
}

pub async fn delete_income(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedIdentity>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let id = parse_record_id(&id)?;

    state
        .ledger_service
        .delete_income(&caller.identity_id, &id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("Income deleted")))
}
