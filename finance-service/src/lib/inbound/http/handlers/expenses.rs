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
use crate::ledger::models::Expense;
use crate::ledger::models::NewExpense;

/// HTTP request body for recording an expense (raw JSON)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateExpenseRequest {
    amount: f64,
    category: String,
    #[serde(default)]
    description: String,
    date: NaiveDate,
    #[serde(default)]
    paid: bool,
}

impl CreateExpenseRequest {
    fn try_into_new_expense(self) -> Result<NewExpense, LedgerError> {
        Ok(NewExpense {
            amount: Amount::new(self.amount)?,
            category: self.category,
            description: self.description,
            date: self.date,
            paid: self.paid,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseData {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Expense> for ExpenseData {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id.0,
            user_id: expense.owner.value(),
            amount: expense.amount.value(),
            category: expense.category.clone(),
            description: expense.description.clone(),
            date: expense.date,
            paid: expense.paid,
            created_at: expense.created_at,
        }
    }
}

pub async fn create_expense(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedIdentity>,
    body: Result<Json<CreateExpenseRequest>, JsonRejection>,
) -> Result<ApiSuccess<ExpenseData>, ApiError> {
    let Json(body) = body?;

    state
        .ledger_service
        .add_expense(&caller.identity_id, body.try_into_new_expense()?)
        .await
        .map_err(ApiError::from)
        .map(|ref expense| ApiSuccess::new(StatusCode::OK, expense.into()))
}

pub async fn list_expenses(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedIdentity>,
) -> Result<ApiSuccess<Vec<ExpenseData>>, ApiError> {
    let expenses = state
        .ledger_service
        .list_expenses(&caller.identity_id)
        .await?;

    non_empty(expenses, "No expenses found")
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedIdentity>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let id = parse_record_id(&id)?;

    state
        .ledger_service
        .delete_expense(&caller.identity_id, &id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("Expense deleted")))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePaidRequest {
    paid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseUpdatedData {
    pub message: String,
    pub expense: ExpenseData,
}

pub async fn update_expense_paid(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedIdentity>,
    Path(id): Path<String>,
    body: Result<Json<UpdatePaidRequest>, JsonRejection>,
) -> Result<ApiSuccess<ExpenseUpdatedData>, ApiError> {
    let id = parse_record_id(&id)?;
    let Json(body) = body?;

    state
        .ledger_service
        .set_expense_paid(&caller.identity_id, &id, body.paid)
        .await
        .map_err(ApiError::from)
        .map(|ref expense| {
            ApiSuccess::new(
                StatusCode::OK,
                ExpenseUpdatedData {
                    message: "Expense status updated".to_string(),
                    expense: expense.into(),
                },
            )
        })
}
