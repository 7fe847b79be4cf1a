//! WebSocket upgrade and per-connection handler. Sends the one-time
//! `connected` frame, then relays broadcast snapshots until the viewer leaves.

use std::net::SocketAddr;
use std::sync::atomic::Ordering;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        ConnectInfo, State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state)
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, peer))
}

async fn handle_socket(socket: WebSocket, state: AppState, peer: SocketAddr) {
    let id = state.next_client_id.fetch_add(1, Ordering::Relaxed);
    let clients = state.client_count.fetch_add(1, Ordering::Relaxed) + 1;
    info!(id, %peer, clients, "viewer connected");

    // Ensure we decrement on disconnect (drop).
    struct ClientGuard(AppState, u64);
    impl Drop for ClientGuard {
        fn drop(&mut self) {
            let left = self.0.client_count.fetch_sub(1, Ordering::Relaxed) - 1;
            info!(id = self.1, clients = left, "viewer disconnected");
        }
    }
    let _guard = ClientGuard(state.clone(), id);

    // Subscribe before the connection read so no tick is missed in between.
    let mut frames = state.monitor.subscribe();
    let (mut tx, mut rx) = socket.split();

    let hello = state.monitor.connection_frame().await;
    if tx.send(Message::Text(hello)).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            frame = frames.recv() => match frame {
                Ok(js) => {
                    if tx.send(Message::Text(js)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(n)) => {
                    warn!(id, skipped = n, "viewer lagging; dropped oldest snapshots");
                }
                Err(RecvError::Closed) => break,
            },
            msg = rx.next() => match msg {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                // Viewers never send application data
                Some(Ok(_)) => {}
            },
        }
    }
}

/// Serves the router on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: tokio::net::TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
}
