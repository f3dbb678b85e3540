//! Miscellaneous expense primitives.
//!
//! Overheads outside deliveries and purchases (transport, repairs, wages).
//! Append-only: the report is a date-window listing with a sum, not a
//! per-row ledger, so there is no amend/delete path and no recompute.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{EngineError, MoneyPaise, ResultEngine};

/// A persisted expense entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub expense_id: i64,
    pub expense_date: NaiveDate,
    pub expense_type: String,
    pub amount: MoneyPaise,
}

/// Input for recording an expense.
#[derive(Clone, Debug)]
pub struct NewExpense {
    pub expense_date: NaiveDate,
    pub expense_type: String,
    pub amount: MoneyPaise,
}

impl NewExpense {
    pub(crate) fn validate(&self) -> ResultEngine<()> {
        if self.expense_type.trim().is_empty() {
            return Err(EngineError::InvalidEntry(
                "expense type must not be empty".to_string(),
            ));
        }
        if self.amount.is_negative() {
            return Err(EngineError::InvalidEntry(
                "amount must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "other_expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub expense_id: i64,
    pub expense_date: Date,
    pub expense_type: String,
    pub amount_paise: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Expense {
    fn from(model: Model) -> Self {
        Self {
            expense_id: model.expense_id,
            expense_date: model.expense_date,
            expense_type: model.expense_type,
            amount: MoneyPaise::new(model.amount_paise),
        }
    }
}

impl From<&NewExpense> for ActiveModel {
    fn from(new: &NewExpense) -> Self {
        Self {
            expense_id: ActiveValue::NotSet,
            expense_date: ActiveValue::Set(new.expense_date),
            expense_type: ActiveValue::Set(new.expense_type.trim().to_string()),
            amount_paise: ActiveValue::Set(new.amount.paise()),
        }
    }
}
