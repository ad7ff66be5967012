use async_trait::async_trait;

use crate::domain::identity::models::IdentityId;
use crate::domain::ledger::errors::LedgerError;
use crate::domain::ledger::models::Budget;
use crate::domain::ledger::models::Expense;
use crate::domain::ledger::models::Income;
use crate::domain::ledger::models::NewBudget;
use crate::domain::ledger::models::NewExpense;
use crate::domain::ledger::models::NewIncome;
use crate::domain::ledger::models::RecordId;

/// Port for finance record operations.
///
/// Every operation is scoped to `owner`; records belonging to another
/// identity behave as if they did not exist.
#[async_trait]
pub trait LedgerServicePort: Send + Sync + 'static {
    async fn add_expense(&self, owner: &IdentityId, expense: NewExpense)
        -> Result<Expense, LedgerError>;

    async fn list_expenses(&self, owner: &IdentityId) -> Result<Vec<Expense>, LedgerError>;

    /// # Errors
    /// * `NotFound` - No such expense for this owner
    async fn delete_expense(&self, owner: &IdentityId, id: &RecordId) -> Result<(), LedgerError>;

    /// # Errors
    /// * `NotFound` - No such expense for this owner
    async fn set_expense_paid(
        &self,
        owner: &IdentityId,
        id: &RecordId,
        paid: bool,
    ) -> Result<Expense, LedgerError>;

    async fn add_income(&self, owner: &IdentityId, income: NewIncome)
        -> Result<Income, LedgerError>;

    async fn list_incomes(&self, owner: &IdentityId) -> Result<Vec<Income>, LedgerError>;

    /// # Errors
    /// * `NotFound` - No such income for this owner
    async fn delete_income(&self, owner: &IdentityId, id: &RecordId) -> Result<(), LedgerError>;

    /// # Errors
    /// * `InvalidPeriod` - Budget ends before it starts
    async fn add_budget(&self, owner: &IdentityId, budget: NewBudget)
        -> Result<Budget, LedgerError>;

    async fn list_budgets(&self, owner: &IdentityId) -> Result<Vec<Budget>, LedgerError>;

    /// # Errors
    /// * `NotFound` - No such budget for this owner
    async fn delete_budget(&self, owner: &IdentityId, id: &RecordId) -> Result<(), LedgerError>;
}

/// Persistence operations for finance records.
#[async_trait]
pub trait LedgerRepository: Send + Sync + 'static {
    async fn create_expense(
        &self,
        owner: &IdentityId,
        expense: NewExpense,
    ) -> Result<Expense, LedgerError>;

    async fn list_expenses(&self, owner: &IdentityId) -> Result<Vec<Expense>, LedgerError>;

    /// Returns false when no expense with this id belongs to `owner`.
    async fn delete_expense(&self, owner: &IdentityId, id: &RecordId)
        -> Result<bool, LedgerError>;

    /// Returns None when no expense with this id belongs to `owner`.
    async fn set_expense_paid(
        &self,
        owner: &IdentityId,
        id: &RecordId,
        paid: bool,
    ) -> Result<Option<Expense>, LedgerError>;

    async fn create_income(&self, owner: &IdentityId, income: NewIncome)
        -> Result<Income, LedgerError>;

    async fn list_incomes(&self, owner: &IdentityId) -> Result<Vec<Income>, LedgerError>;

    async fn delete_income(&self, owner: &IdentityId, id: &RecordId)
        -> Result<bool, LedgerError>;

    async fn create_budget(&self, owner: &IdentityId, budget: NewBudget)
        -> Result<Budget, LedgerError>;

    async fn list_budgets(&self, owner: &IdentityId) -> Result<Vec<Budget>, LedgerError>;

    async fn delete_budget(&self, owner: &IdentityId, id: &RecordId)
        -> Result<bool, LedgerError>;
}
