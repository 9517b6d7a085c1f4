use crate::AppState;
use crate::credentials::turn_credentials;
use crate::signaling::room_socket;
use axum::Router;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;

pub const LIVENESS_TEXT: &str = "WebRTC Signaling Server";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/rooms/{room}", get(room_socket))
        .route("/rooms/{room}/turn", get(turn_credentials))
        .fallback(fallback)
        .with_state(state)
}

pub(crate) fn liveness() -> impl IntoResponse {
    (StatusCode::OK, LIVENESS_TEXT)
}

async fn fallback(method: Method) -> Response {
    if method == Method::GET {
        liveness().into_response()
    } else {
        StatusCode::METHOD_NOT_ALLOWED.into_response()
    }
}
