use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{router_for_tests, run, run_with_listener, spawn_with_listener};

mod deliveries;
mod expenses;
mod purchases;
mod reports;
mod server;
mod shops;

pub mod types {
    pub mod shop {
        pub use api_types::shop::{ShopListResponse, ShopNew, ShopUpdate, ShopView};
    }

    pub mod delivery {
        pub use api_types::delivery::{
            BalanceResponse, DeliveryListResponse, DeliveryNew, DeliveryUpdate, DeliveryView,
            RecomputeResponse,
        };
    }

    pub mod purchase {
        pub use api_types::purchase::{
            PurchaseListQuery, PurchaseListResponse, PurchaseNew, PurchaseTotalsResponse,
            PurchaseView,
        };
    }

    pub mod expense {
        pub use api_types::expense::{
            ExpenseNew, ExpenseReportQuery, ExpenseReportResponse, ExpenseView,
        };
    }

    pub mod report {
        pub use api_types::report::{DeliveryReportQuery, DeliveryReportResponse};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_)
        | EngineError::LedgerBusy(_)
        | EngineError::ShopNotEmpty(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidEntry(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
