//! Deliveries API endpoints

use api_types::delivery::{
    BalanceResponse, DeliveryListResponse, DeliveryNew, DeliveryUpdate, DeliveryView,
    RecomputeResponse,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::MoneyPaise;

use crate::{ServerError, server::ServerState};

fn view(delivery: engine::Delivery) -> DeliveryView {
    DeliveryView {
        transaction_id: delivery.transaction_id,
        shop_id: delivery.shop_id,
        transaction_date: delivery.transaction_date,
        cylinders_delivered: delivery.cylinders_delivered,
        empty_cylinders_received: delivery.empty_cylinders_received,
        price_per_cylinder_paise: delivery.price_per_cylinder.paise(),
        total_amount_paise: delivery.total_amount.paise(),
        payment_cash_paise: delivery.payment_cash.paise(),
        payment_upi_paise: delivery.payment_upi.paise(),
        balance_after_paise: delivery.balance_after.paise(),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DeliveryNew>,
) -> Result<(StatusCode, Json<DeliveryView>), ServerError> {
    let delivery = state
        .engine
        .record_delivery(engine::NewDelivery {
            shop_id: payload.shop_id,
            transaction_date: payload.transaction_date,
            cylinders_delivered: payload.cylinders_delivered,
            empty_cylinders_received: payload.empty_cylinders_received,
            price_per_cylinder: MoneyPaise::new(payload.price_per_cylinder_paise),
            payment_cash: MoneyPaise::new(payload.payment_cash_paise),
            payment_upi: MoneyPaise::new(payload.payment_upi_paise),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(view(delivery))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(transaction_id): Path<i64>,
    Json(payload): Json<DeliveryUpdate>,
) -> Result<Json<DeliveryView>, ServerError> {
    let delivery = state
        .engine
        .update_delivery(
            transaction_id,
            engine::DeliveryPatch {
                transaction_date: payload.transaction_date,
                cylinders_delivered: payload.cylinders_delivered,
                empty_cylinders_received: payload.empty_cylinders_received,
                price_per_cylinder: payload.price_per_cylinder_paise.map(MoneyPaise::new),
                payment_cash: payload.payment_cash_paise.map(MoneyPaise::new),
                payment_upi: payload.payment_upi_paise.map(MoneyPaise::new),
            },
        )
        .await?;

    Ok(Json(view(delivery)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(transaction_id): Path<i64>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_delivery(transaction_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list(
    State(state): State<ServerState>,
    Path(shop_id): Path<i64>,
) -> Result<Json<DeliveryListResponse>, ServerError> {
    let deliveries = state.engine.list_deliveries(shop_id).await?;

    Ok(Json(DeliveryListResponse {
        deliveries: deliveries.into_iter().map(view).collect(),
    }))
}

pub async fn balance(
    State(state): State<ServerState>,
    Path(shop_id): Path<i64>,
) -> Result<Json<BalanceResponse>, ServerError> {
    let balance = state.engine.current_balance(shop_id).await?;

    Ok(Json(BalanceResponse {
        shop_id,
        balance_paise: balance.paise(),
    }))
}

pub async fn recompute(
    State(state): State<ServerState>,
    Path(shop_id): Path<i64>,
) -> Result<Json<RecomputeResponse>, ServerError> {
    let rows_changed = state.engine.recompute_shop_balances(shop_id).await?;

    Ok(Json(RecomputeResponse {
        shop_id,
        rows_changed,
    }))
}
