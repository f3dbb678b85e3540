use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{deliveries, expenses, purchases, reports, shops};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/shops", post(shops::create).get(shops::list))
        .route(
            "/shops/{id}",
            axum::routing::patch(shops::update).delete(shops::remove),
        )
        .route("/shops/{id}/deliveries", get(deliveries::list))
        .route("/shops/{id}/balance", get(deliveries::balance))
        .route("/shops/{id}/recompute", post(deliveries::recompute))
        .route("/deliveries", post(deliveries::create))
        .route(
            "/deliveries/{id}",
            axum::routing::patch(deliveries::update).delete(deliveries::remove),
        )
        .route("/purchases", post(purchases::create).get(purchases::list))
        .route("/purchases/totals", get(purchases::totals))
        .route("/expenses", post(expenses::create))
        .route("/reports/deliveries", get(reports::deliveries))
        .route("/reports/expenses", get(reports::expense_window))
        .with_state(state)
}

/// Router over the given engine, without binding a listener. Intended for
/// in-process tests that drive it with `tower::ServiceExt::oneshot`.
pub fn router_for_tests(engine: Engine) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
    })
}

pub async fn run(engine: Engine, bind: &str) {
    let listener = match tokio::net::TcpListener::bind(bind).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
