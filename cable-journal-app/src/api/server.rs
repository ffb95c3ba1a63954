use axum::{routing::post, Router};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::routes::{call_channel, AppState};
use cable_journal_core::Gateway;

pub fn router(gateway: Arc<dyn Gateway>) -> Router {
    let state = Arc::new(AppState {
        gateway,
        turn: Mutex::new(()),
    });

    Router::new()
        .route("/ipc/:channel", post(call_channel))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(gateway: Arc<dyn Gateway>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(gateway);
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "serving channels");
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
