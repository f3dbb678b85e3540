//! Reports API endpoints

use api_types::expense::{ExpenseReportQuery, ExpenseReportResponse};
use api_types::report::{DeliveryReportQuery, DeliveryReportResponse};
use axum::{
    Json,
    extract::{Query, State},
};

use crate::{ServerError, expenses, server::ServerState};

pub async fn deliveries(
    State(state): State<ServerState>,
    Query(query): Query<DeliveryReportQuery>,
) -> Result<Json<DeliveryReportResponse>, ServerError> {
    if query.from > query.to {
        return Err(ServerError::Generic(
            "from must not be after to".to_string(),
        ));
    }
    let totals = state
        .engine
        .delivery_report(query.shop_id, query.from, query.to)
        .await?;

    Ok(Json(DeliveryReportResponse {
        cylinders_delivered: totals.cylinders_delivered,
        empty_cylinders_received: totals.empty_cylinders_received,
        pending_return: totals.pending_return,
        total_amount_paise: totals.total_amount.paise(),
        payment_cash_paise: totals.payment_cash.paise(),
        payment_upi_paise: totals.payment_upi.paise(),
        balance_paise: totals.balance.paise(),
    }))
}

pub async fn expense_window(
    State(state): State<ServerState>,
    Query(query): Query<ExpenseReportQuery>,
) -> Result<Json<ExpenseReportResponse>, ServerError> {
    if query.from > query.to {
        return Err(ServerError::Generic(
            "from must not be after to".to_string(),
        ));
    }
    let report = state.engine.expense_report(query.from, query.to).await?;

    Ok(Json(ExpenseReportResponse {
        expenses: report.expenses.into_iter().map(expenses::view).collect(),
        total_paise: report.total.paise(),
    }))
}
