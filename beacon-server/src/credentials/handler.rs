use crate::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use beacon_core::{IceServerConfig, RoomId};
use serde::Serialize;
use tracing::debug;

#[derive(Serialize)]
struct IceServersBody {
    #[serde(rename = "iceServers")]
    ice_servers: Vec<IceServerConfig>,
}

/// `GET /rooms/{room}/turn`
pub async fn turn_credentials(
    Path(room): Path<RoomId>,
    State(state): State<AppState>,
) -> Response {
    debug!("ICE server request for room '{}'", room);

    match state.credentials.ice_servers().await {
        Ok(ice_servers) => (
            [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
            Json(IceServersBody { ice_servers }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
