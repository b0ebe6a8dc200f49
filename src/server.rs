use crate::models::issue::InboundEvent;
use crate::sync::handler::AssetSyncHandler;
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tracing::info;

pub fn router(handler: Arc<AssetSyncHandler>) -> Router {
    Router::new()
        .route("/webhook", post(receive_webhook))
        .route("/health", get(health))
        .with_state(handler)
}

pub async fn serve(handler: AssetSyncHandler, bind_address: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    info!("Webhook receiver listening on {}", listener.local_addr()?);

    axum::serve(listener, router(Arc::new(handler)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Webhook server stopped unexpectedly")?;

    info!("Webhook receiver stopped");
    Ok(())
}

async fn receive_webhook(
    State(handler): State<Arc<AssetSyncHandler>>,
    body: String,
) -> impl IntoResponse {
    let response = handler.handle(&InboundEvent::new(body)).await;
    let status = StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        response.body,
    )
}

async fn health() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    // Without a signal handler the server simply runs until killed.
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
