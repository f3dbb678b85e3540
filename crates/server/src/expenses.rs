//! Other expenses API endpoints

use api_types::expense::{ExpenseNew, ExpenseView};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use engine::MoneyPaise;

use crate::{ServerError, server::ServerState};

pub(crate) fn view(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        expense_id: expense.expense_id,
        expense_date: expense.expense_date,
        expense_type: expense.expense_type,
        amount_paise: expense.amount.paise(),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let expense = state
        .engine
        .record_expense(engine::NewExpense {
            expense_date: payload.expense_date,
            expense_type: payload.expense_type,
            amount: MoneyPaise::new(payload.amount_paise),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(view(expense))))
}
