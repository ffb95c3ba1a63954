use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;

use cable_journal_core::{argument_failure, invoke, Channel, CoreError, Gateway};

pub struct AppState {
    pub gateway: Arc<dyn Gateway>,
    /// One call at a time, like a single front-end event loop.
    pub turn: Mutex<()>,
}

type Rejection = (StatusCode, Json<Value>);

/// `POST /ipc/{channel}` with the channel's argument (if any) as the JSON body.
pub async fn call_channel(
    State(st): State<Arc<AppState>>,
    Path(channel): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, Rejection> {
    let channel: Channel = channel.parse().map_err(bad_request)?;
    // Channels without an argument ignore whatever body was sent.
    let arg = if !channel.takes_entries() || body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        match serde_json::from_slice(&body) {
            Ok(v) => Some(v),
            Err(e) => return Ok(Json(argument_failure(channel, e))),
        }
    };

    let _turn = st.turn.lock().await;
    let reply = invoke(&*st.gateway, channel, arg)
        .await
        .map_err(|e| reject(StatusCode::INTERNAL_SERVER_ERROR, e))?;
    Ok(Json(reply))
}

/// Only an unknown channel name is refused outright.
fn bad_request(e: CoreError) -> Rejection {
    reject(StatusCode::BAD_REQUEST, e)
}

fn reject(status: StatusCode, e: CoreError) -> Rejection {
    (status, Json(json!({ "error": e.to_string() })))
}
