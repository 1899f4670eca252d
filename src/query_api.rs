use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tracing::info;

use crate::snapshot_store::SnapshotStore;

/// Read-only query surface over the snapshot store.
///
/// Readers never drive the ingest loop and never see internal failures;
/// "no data yet" is a modeled state with its own status code.
pub fn router(store: Arc<SnapshotStore>) -> Router {
    Router::new()
        .route("/latest-data", get(latest_data))
        .with_state(store)
}

async fn latest_data(State(store): State<Arc<SnapshotStore>>) -> Response {
    match store.read() {
        Some(estimate) => (StatusCode::OK, Json(estimate)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Serves the query endpoint for the lifetime of the process.
pub async fn serve(listen_addr: SocketAddr, store: Arc<SnapshotStore>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(listen_addr).await?;
    info!("query endpoint listening on {listen_addr}");
    axum::serve(listener, router(store)).await?;
    Ok(())
}
