use async_trait::async_trait;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::identity::models::IdentityId;
use crate::domain::ledger::errors::LedgerError;
use crate::domain::ledger::models::Amount;
use crate::domain::ledger::models::Budget;
use crate::domain::ledger::models::Expense;
use crate::domain::ledger::models::Income;
use crate::domain::ledger::models::NewBudget;
use crate::domain::ledger::models::NewExpense;
use crate::domain::ledger::models::NewIncome;
use crate::domain::ledger::models::RecordId;
use crate::domain::ledger::ports::LedgerRepository;

pub struct PostgresLedgerRepository {
    pool: PgPool,
}

impl PostgresLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn database_error(e: sqlx::Error) -> LedgerError {
    LedgerError::DatabaseError(e.to_string())
}

#[derive(Debug, FromRow)]
struct ExpenseRow {
    id: i64,
    user_id: i64,
    amount: f64,
    category: String,
    description: String,
    date: NaiveDate,
    paid: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<ExpenseRow> for Expense {
    type Error = LedgerError;

    fn try_from(row: ExpenseRow) -> Result<Self, Self::Error> {
        Ok(Expense {
            id: RecordId(row.id),
            owner: IdentityId(row.user_id),
            amount: Amount::new(row.amount)?,
            category: row.category,
            description: row.description,
            date: row.date,
            paid: row.paid,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct IncomeRow {
    id: i64,
    user_id: i64,
    amount: f64,
    category: String,
    description: String,
    date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl TryFrom<IncomeRow> for Income {
    type Error = LedgerError;

    fn try_from(row: IncomeRow) -> Result<Self, Self::Error> {
        Ok(Income {
            id: RecordId(row.id),
            owner: IdentityId(row.user_id),
            amount: Amount::new(row.amount)?,
            category: row.category,
            description: row.description,
            date: row.date,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct BudgetRow {
    id: i64,
    user_id: i64,
    budget_name: String,
    budget_amount: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    notes: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<BudgetRow> for Budget {
    type Error = LedgerError;

    fn try_from(row: BudgetRow) -> Result<Self, Self::Error> {
        Ok(Budget {
            id: RecordId(row.id),
            owner: IdentityId(row.user_id),
            name: row.budget_name,
            amount: Amount::new(row.budget_amount)?,
            start_date: row.start_date,
            end_date: row.end_date,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

const EXPENSE_COLUMNS: &str = "id, user_id, amount, category, description, date, paid, created_at";
const INCOME_COLUMNS: &str = "id, user_id, amount, category, description, date, created_at";
const BUDGET_COLUMNS: &str =
    "id, user_id, budget_name, budget_amount, start_date, end_date, notes, created_at";

#[async_trait]
impl LedgerRepository for PostgresLedgerRepository {
    async fn create_expense(
        &self,
        owner: &IdentityId,
        expense: NewExpense,
    ) -> Result<Expense, LedgerError> {
        sqlx::query_as::<_, ExpenseRow>(&format!(
            r#"
            INSERT INTO expenses (user_id, amount, category, description, date, paid)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(owner.value())
        .bind(expense.amount.value())
        .bind(&expense.category)
        .bind(&expense.description)
        .bind(expense.date)
        .bind(expense.paid)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?
        .try_into()
    }

    async fn list_expenses(&self, owner: &IdentityId) -> Result<Vec<Expense>, LedgerError> {
        sqlx::query_as::<_, ExpenseRow>(&format!(
            r#"
            SELECT {EXPENSE_COLUMNS}
            FROM expenses
            WHERE user_id = $1
            ORDER BY date DESC, id DESC
            "#
        ))
        .bind(owner.value())
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?
        .into_iter()
        .map(Expense::try_from)
        .collect()
    }

    async fn delete_expense(
        &self,
        owner: &IdentityId,
        id: &RecordId,
    ) -> Result<bool, LedgerError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
            .bind(id.0)
            .bind(owner.value())
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_expense_paid(
        &self,
        owner: &IdentityId,
        id: &RecordId,
        paid: bool,
    ) -> Result<Option<Expense>, LedgerError> {
        sqlx::query_as::<_, ExpenseRow>(&format!(
            r#"
            UPDATE expenses
            SET paid = $3
            WHERE id = $1 AND user_id = $2
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(id.0)
        .bind(owner.value())
        .bind(paid)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .map(Expense::try_from)
        .transpose()
    }

    async fn create_income(
        &self,
        owner: &IdentityId,
        income: NewIncome,
    ) -> Result<Income, LedgerError> {
        sqlx::query_as::<_, IncomeRow>(&format!(
            r#"
            INSERT INTO incomes (user_id, amount, category, description, date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {INCOME_COLUMNS}
            "#
        ))
        .bind(owner.value())
        .bind(income.amount.value())
        .bind(&income.category)
        .bind(&income.description)
        .bind(income.date)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?
        .try_into()
    }

    async fn list_incomes(&self, owner: &IdentityId) -> Result<Vec<Income>, LedgerError> {
        sqlx::query_as::<_, IncomeRow>(&format!(
            r#"
            SELECT {INCOME_COLUMNS}
            FROM incomes
            WHERE user_id = $1
            ORDER BY date DESC, id DESC
            "#
        ))
        .bind(owner.value())
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?
        .into_iter()
        .map(Income::try_from)
        .collect()
    }

    async fn delete_income(&self, owner: &IdentityId, id: &RecordId) -> Result<bool, LedgerError> {
        let result = sqlx::query("DELETE FROM incomes WHERE id = $1 AND user_id = $2")
            .bind(id.0)
            .bind(owner.value())
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_budget(
        &self,
        owner: &IdentityId,
        budget: NewBudget,
    ) -> Result<Budget, LedgerError> {
        sqlx::query_as::<_, BudgetRow>(&format!(
            r#"
            INSERT INTO budgets (user_id, budget_name, budget_amount, start_date, end_date, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {BUDGET_COLUMNS}
            "#
        ))
        .bind(owner.value())
        .bind(&budget.name)
        .bind(budget.amount.value())
        .bind(budget.start_date)
        .bind(budget.end_date)
        .bind(&budget.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?
        .try_into()
    }

    async fn list_budgets(&self, owner: &IdentityId) -> Result<Vec<Budget>, LedgerError> {
        sqlx::query_as::<_, BudgetRow>(&format!(
            r#"
            SELECT {BUDGET_COLUMNS}
            FROM budgets
            WHERE user_id = $1
            ORDER BY start_date DESC, id DESC
            "#
        ))
        .bind(owner.value())
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?
        .into_iter()
        .map(Budget::try_from)
        .collect()
    }

    async fn delete_budget(&self, owner: &IdentityId, id: &RecordId) -> Result<bool, LedgerError> {
        let result = sqlx::query("DELETE FROM budgets WHERE id = $1 AND user_id = $2")
            .bind(id.0)
            .bind(owner.value())
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected() > 0)
    }
}
