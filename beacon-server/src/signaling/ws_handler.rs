use crate::AppState;
use crate::router::liveness;
use crate::room::RoomManager;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, Query, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use beacon_core::{PeerId, RoomId};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, info};

#[derive(Debug, Default, Deserialize)]
pub struct ConnectParams {
    /// Identity the client picked for itself. The relay mints one if absent.
    #[serde(rename = "_pk")]
    pub id: Option<String>,
}

/// `GET /rooms/{room}`. Upgrades to the signaling socket; a plain request gets
/// the liveness text.
pub async fn room_socket(
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    Path(room): Path<RoomId>,
    Query(params): Query<ConnectParams>,
    State(state): State<AppState>,
) -> Response {
    let Ok(ws) = upgrade else {
        return liveness().into_response();
    };

    let peer_id = params
        .id
        .filter(|id| !id.is_empty())
        .map(PeerId::from)
        .unwrap_or_default();

    ws.on_upgrade(move |socket| handle_socket(socket, room, peer_id, state.rooms))
        .into_response()
}

async fn handle_socket(socket: WebSocket, room: RoomId, peer_id: PeerId, rooms: RoomManager) {
    info!("New WebSocket connection: {} in room '{}'", peer_id, room);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let member = rooms.join(room.clone(), peer_id.clone(), tx);

    // Ends when the room drops this member, which closes `rx`.
    let mut send_task = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    });

    // Owns the membership; aborting or finishing the task leaves the room.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => member.send(text.as_str()),
                Message::Close(_) => break,
                other => debug!("Ignoring non-text frame from {}: {:?}", member.peer_id(), other),
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    info!("WebSocket disconnected: {} from room '{}'", peer_id, room);
}
