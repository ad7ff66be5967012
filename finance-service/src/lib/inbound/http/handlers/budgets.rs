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
use crate::ledger::models::Budget;
use crate::ledger::models::NewBudget;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateBudgetRequest {
    budget_name: String,
    budget_amount: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    #[serde(default)]
    notes: String,
}

impl CreateBudgetRequest {
    fn try_into_new_budget(self) -> Result<NewBudget, LedgerError> {
        Ok(NewBudget {
            name: self.budget_name,
            amount: Amount::new(self.budget_amount)?,
            start_date: self.start_date,
            end_date: self.end_date,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetData {
    pub id: i64,
    pub user_id: i64,
    pub budget_name: String,
    pub budget_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Budget> for BudgetData {
    fn from(budget: &Budget) -> Self {
        Self {
            id: budget.id.0,
            user_id: budget.owner.value(),
            budget_name: budget.name.clone(),
            budget_amount: budget.amount.value(),
            start_date: budget.start_date,
            end_date: budget.end_date,
            notes: budget.notes.clone(),
            created_at: budget.created_at,
        }
    }
}

pub async fn create_budget(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedIdentity>,
    body: Result<Json<CreateBudgetRequest>, JsonRejection>,
) -> Result<ApiSuccess<BudgetData>, ApiError> {
    let Json(body) = body?;

    state
        .ledger_service
        .add_budget(&caller.identity_id, body.try_into_new_budget()?)
        .await
        .map_err(ApiError::from)
        .map(|ref budget| ApiSuccess::new(StatusCode::OK, budget.into()))
}

pub async fn list_budgets(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedIdentity>,
) -> Result<ApiSuccess<Vec<BudgetData>>, ApiError> {
    let budgets = state
        .ledger_service
        .list_budgets(&caller.identity_id)
        .await?;

    non_empty(budgets, "No budgets found")
}

pub async fn delete_budget(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedIdentity>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let id = parse_record_id(&id)?;

    state
        .ledger_service
        .delete_budget(&caller.identity_id, &id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("Budget deleted")))
}
