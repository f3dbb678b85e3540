//! Shops API endpoints

use api_types::shop::{ShopListResponse, ShopNew, ShopUpdate, ShopView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

fn view(shop: engine::Shop) -> ShopView {
    ShopView {
        shop_id: shop.shop_id,
        shop_name: shop.shop_name,
        mobile_number: shop.mobile_number,
        address: shop.address,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ShopNew>,
) -> Result<(StatusCode, Json<ShopView>), ServerError> {
    let shop = state
        .engine
        .create_shop(engine::NewShop {
            shop_name: payload.shop_name,
            mobile_number: payload.mobile_number,
            address: payload.address,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(view(shop))))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<ShopListResponse>, ServerError> {
    let shops = state.engine.list_shops().await?;

    Ok(Json(ShopListResponse {
        shops: shops.into_iter().map(view).collect(),
    }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(shop_id): Path<i64>,
    Json(payload): Json<ShopUpdate>,
) -> Result<Json<ShopView>, ServerError> {
    let shop = state
        .engine
        .update_shop(
            shop_id,
            engine::ShopPatch {
                shop_name: payload.shop_name,
                mobile_number: payload.mobile_number,
                address: payload.address,
            },
        )
        .await?;

    Ok(Json(view(shop)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(shop_id): Path<i64>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_shop(shop_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
