//! WebSocket endpoint for live reload.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::broadcast::{self, error::RecvError};

use super::{ANY_PAGE, ReloadEvent};
use crate::state::AppState;

/// Handle GET /ws/live-reload.
pub(crate) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let Some(live_reload) = state.live_reload.as_ref() else {
        return;
    };

    tracing::debug!("Live reload client connected");
    let reason = relay(socket, live_reload.subscribe()).await;
    tracing::debug!(reason, "Live reload client disconnected");
}

/// Forward reload events until either side goes away.
///
/// Returns why the connection ended.
async fn relay(mut socket: WebSocket, mut events: broadcast::Receiver<ReloadEvent>) -> &'static str {
    loop {
        tokio::select! {
            event = events.recv() => {
                let event = match event {
                    Ok(event) => event,
                    // Missed events collapse into one reload of every page.
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Live reload client lagged");
                        ReloadEvent::reload(ANY_PAGE)
                    }
                    Err(RecvError::Closed) => return "server stopped",
                };
                let Some(text) = encode(&event) else {
                    continue;
                };
                if socket.send(Message::Text(text)).await.is_err() {
                    return "send failed";
                }
            }
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | None => return "closed by client",
                Some(Ok(_)) => {}
                Some(Err(_)) => return "receive failed",
            },
        }
    }
}

fn encode(event: &ReloadEvent) -> Option<Utf8Bytes> {
    match serde_json::to_string(event) {
        Ok(json) => Some(json.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to encode reload event");
            None
        }
    }
}
