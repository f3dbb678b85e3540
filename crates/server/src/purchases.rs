//! Cylinder purchases API endpoints

use api_types::purchase::{
    PurchaseListQuery, PurchaseListResponse, PurchaseNew, PurchaseTotalsResponse, PurchaseView,
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use engine::MoneyPaise;

use crate::{ServerError, server::ServerState};

fn view(purchase: engine::Purchase) -> PurchaseView {
    PurchaseView {
        purchase_id: purchase.purchase_id,
        purchase_date: purchase.purchase_date,
        cylinders_purchased: purchase.cylinders_purchased,
        empty_cylinders_returned: purchase.empty_cylinders_returned,
        price_per_cylinder_paise: purchase.price_per_cylinder.paise(),
        total_amount_paise: purchase.total_amount.paise(),
        payment_cash_paise: purchase.payment_cash.paise(),
        payment_upi_paise: purchase.payment_upi.paise(),
        outstanding_paise: purchase.outstanding.paise(),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<PurchaseNew>,
) -> Result<(StatusCode, Json<PurchaseView>), ServerError> {
    let purchase = state
        .engine
        .record_purchase(engine::NewPurchase {
            purchase_date: payload.purchase_date,
            cylinders_purchased: payload.cylinders_purchased,
            empty_cylinders_returned: payload.empty_cylinders_returned,
            price_per_cylinder: MoneyPaise::new(payload.price_per_cylinder_paise),
            payment_cash: MoneyPaise::new(payload.payment_cash_paise),
            payment_upi: MoneyPaise::new(payload.payment_upi_paise),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(view(purchase))))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PurchaseListQuery>,
) -> Result<Json<PurchaseListResponse>, ServerError> {
    if query.from > query.to {
        return Err(ServerError::Generic(
            "from must not be after to".to_string(),
        ));
    }
    let purchases = state.engine.list_purchases(query.from, query.to).await?;

    Ok(Json(PurchaseListResponse {
        purchases: purchases.into_iter().map(view).collect(),
    }))
}

pub async fn totals(
    State(state): State<ServerState>,
) -> Result<Json<PurchaseTotalsResponse>, ServerError> {
    let totals = state.engine.purchase_totals().await?;

    Ok(Json(PurchaseTotalsResponse {
        cylinders_purchased: totals.cylinders_purchased,
        empty_cylinders_returned: totals.empty_cylinders_returned,
        pending_return: totals.pending_return,
        outstanding_paise: totals.outstanding.paise(),
    }))
}
