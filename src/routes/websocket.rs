use axum::{
    Router,
    extract::{Query, State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use crate::{services::websocket_service, state::SharedState};

/// Query parameters required to join a session's push channel.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Identifier of the session to register against.
    pub session: String,
}

#[utoipa::path(
    get,
    path = "/ws",
    tag = "ws",
    params(("session" = String, Query, description = "Session id to register against")),
    responses((status = 101, description = "Switching protocols to WebSocket"))
)]
/// Upgrade the HTTP connection into a scoreboard WebSocket session.
///
/// Requests without a `session` parameter are rejected before the upgrade.
pub async fn ws_handler(
    State(state): State<SharedState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let shared_state = state.clone();
    ws.on_upgrade(move |socket| {
        websocket_service::handle_socket(shared_state, socket, query.session)
    })
}

/// Configure the WebSocket endpoint.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/ws", get(ws_handler))
}
