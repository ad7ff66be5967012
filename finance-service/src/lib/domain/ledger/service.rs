use std::sync::Arc;

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
use crate::domain::ledger::ports::LedgerRepository;
use crate::domain::ledger::ports::LedgerServicePort;

/// Domain service for expenses, incomes and budgets.
pub struct LedgerService<LR>
where
    LR: LedgerRepository,
{
    repository: Arc<LR>,
}

impl<LR> LedgerService<LR>
where
    LR: LedgerRepository,
{
    pub fn new(repository: Arc<LR>) -> Self {
        Self { repository }
    }
}

fn found(deleted: bool, kind: &'static str) -> Result<(), LedgerError> {
    if deleted {
        Ok(())
    } else {
        Err(LedgerError::NotFound(kind))
    }
}

#[async_trait]
impl<LR> LedgerServicePort for LedgerService<LR>
where
    LR: LedgerRepository,
{
    async fn add_expense(
        &self,
        owner: &IdentityId,
        expense: NewExpense,
    ) -> Result<Expense, LedgerError> {
        let expense = self.repository.create_expense(owner, expense).await?;
        tracing::debug!(identity_id = %owner, expense_id = %expense.id, "Expense recorded");
        Ok(expense)
    }

    async fn list_expenses(&self, owner: &IdentityId) -> Result<Vec<Expense>, LedgerError> {
        self.repository.list_expenses(owner).await
    }

    async fn delete_expense(&self, owner: &IdentityId, id: &RecordId) -> Result<(), LedgerError> {
        found(self.repository.delete_expense(owner, id).await?, "Expense")
    }

    async fn set_expense_paid(
        &self,
        owner: &IdentityId,
        id: &RecordId,
        paid: bool,
    ) -> Result<Expense, LedgerError> {
        self.repository
            .set_expense_paid(owner, id, paid)
            .await?
            .ok_or(LedgerError::NotFound("Expense"))
    }

    async fn add_income(&self, owner: &IdentityId, income: NewIncome) -> Result<Income, LedgerError> {
        let income = self.repository.create_income(owner, income).await?;
        tracing::debug!(identity_id = %owner, income_id = %income.id, "Income recorded");
        Ok(income)
    }

    async fn list_incomes(&self, owner: &IdentityId) -> Result<Vec<Income>, LedgerError> {
        self.repository.list_incomes(owner).await
    }

    async fn delete_income(&self, owner: &IdentityId, id: &RecordId) -> Result<(), LedgerError> {
        found(self.repository.delete_income(owner, id).await?, "Income")
    }

    async fn add_budget(&self, owner: &IdentityId, budget: NewBudget) -> Result<Budget, LedgerError> {
        budget.validate_period()?;
        let budget = self.repository.create_budget(owner, budget).await?;
        tracing::debug!(identity_id = %owner, budget_id = %budget.id, "Budget recorded");
        Ok(budget)
    }

    async fn list_budgets(&self, owner: &IdentityId) -> Result<Vec<Budget>, LedgerError> {
        self.repository.list_budgets(owner).await
    }

    async fn delete_budget(&self, owner: &IdentityId, id: &RecordId) -> Result<(), LedgerError> {
        found(self.repository.delete_budget(owner, id).await?, "Budget")
    }
}
