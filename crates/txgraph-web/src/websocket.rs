//! WebSocket push channel.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use txgraph_core::{notification, PushMessage};

use crate::state::AppState;

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

fn encode(msg: &PushMessage) -> Option<Message> {
    match serde_json::to_string(msg) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            warn!(error = %e, "Failed to encode push message");
            None
        }
    }
}

/// Handle individual WebSocket connection.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    // Subscribe before building the snapshot so no update falls in between.
    let mut rx = state.tx.subscribe();

    let receiver_count = state.tx.receiver_count();
    info!(receiver_count, "WebSocket client connected");

    let stores = state.stores.clone();
    let mut send_task = tokio::spawn(async move {
        match notification::initial_data(&stores).await {
            Ok(initial) => {
                if let Some(frame) = encode(&initial) {
                    if sender.send(frame).await.is_err() {
                        return;
                    }
                }
            }
            Err(e) => warn!(error = %e, "Error sending initial data"),
        }

        loop {
            match rx.recv().await {
                Ok(msg) => {
                    let Some(frame) = encode(&msg) else { continue };
                    if sender.send(frame).await.is_err() {
                        debug!("WebSocket send failed, client disconnected");
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    // The next update carries the full graph again.
                    debug!(skipped, "WebSocket client lagging behind broadcasts");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    debug!("Received from WebSocket client: {}", text.as_str());
                }
                Message::Close(_) => {
                    debug!("WebSocket client sent close frame");
                    break;
                }
                _ => {}
            }
        }
    });

    // Whichever side finishes first tears the connection down.
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!("WebSocket client disconnected");
}
