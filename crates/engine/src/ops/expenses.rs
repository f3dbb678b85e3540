use chrono::NaiveDate;
use sea_orm::{QueryFilter, QueryOrder, prelude::*};

use crate::{Expense, MoneyPaise, NewExpense, ResultEngine, expenses};

use super::Engine;

/// A date window of expenses together with their sum.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseReport {
    pub expenses: Vec<Expense>,
    pub total: MoneyPaise,
}

impl Engine {
    /// Records an overhead expense. Append-only: there is no amend or delete
    /// path.
    pub async fn record_expense(&self, new: NewExpense) -> ResultEngine<Expense> {
        new.validate()?;
        let inserted = expenses::ActiveModel::from(&new)
            .insert(&self.database)
            .await?;
        tracing::debug!(expense_id = inserted.expense_id, "recorded expense");
        Ok(Expense::from(inserted))
    }

    /// Lists expenses within a date window, oldest first, with their sum.
    pub async fn expense_report(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ResultEngine<ExpenseReport> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::ExpenseDate.gte(from))
            .filter(expenses::Column::ExpenseDate.lte(to))
            .order_by_asc(expenses::Column::ExpenseDate)
            .order_by_asc(expenses::Column::ExpenseId)
            .all(&self.database)
            .await?;

        let mut report = ExpenseReport::default();
        for model in models {
            let expense = Expense::from(model);
            report.total += expense.amount;
            report.expenses.push(expense);
        }
        Ok(report)
    }
}
