use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::session::{CreateSessionRequest, DurationQuery, SessionSnapshot},
    error::AppError,
    services::session_service,
    state::{SharedState, session::SessionAction},
};

/// Routes handling session bootstrap and mutation.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(fetch_session).delete(remove_session))
        .route("/sessions/{id}/actions", post(apply_action))
}

/// Create a session explicitly, overwriting any existing one under the id.
#[utoipa::path(
    post,
    path = "/sessions",
    tag = "session",
    request_body = CreateSessionRequest,
    responses(
        (status = 200, description = "Session created", body = SessionSnapshot),
        (status = 400, description = "Invalid payload")
    )
)]
pub async fn create_session(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateSessionRequest>>,
) -> Json<SessionSnapshot> {
    let session = session_service::create_session(&state, &payload.id, payload.duration);
    Json(SessionSnapshot::from(&session))
}

/// Fetch a session, creating it on first reference.
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    tag = "session",
    params(
        ("id" = String, Path, description = "Identifier of the session"),
        ("duration" = Option<u32>, Query, description = "Countdown length used only when the fetch creates the session")
    ),
    responses((status = 200, description = "Current session state", body = SessionSnapshot))
)]
pub async fn fetch_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<DurationQuery>,
) -> Json<SessionSnapshot> {
    let session = session_service::get_or_create(&state, &id, query.duration);
    Json(SessionSnapshot::from(&session))
}

/// Delete a session; deleting an unknown id is a no-op.
#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    tag = "session",
    params(("id" = String, Path, description = "Identifier of the session")),
    responses((status = 204, description = "Session removed (or was already gone)"))
)]
pub async fn remove_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> StatusCode {
    session_service::delete_session(&state, &id);
    StatusCode::NO_CONTENT
}

/// Apply one action to a session and return the resulting snapshot.
#[utoipa::path(
    post,
    path = "/sessions/{id}/actions",
    tag = "session",
    params(("id" = String, Path, description = "Identifier of the session")),
    request_body = SessionAction,
    responses(
        (status = 200, description = "Action applied", body = SessionSnapshot),
        (status = 404, description = "No such session")
    )
)]
pub async fn apply_action(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(action): Json<SessionAction>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = session_service::apply_action(&state, &id, &action)?;
    Ok(Json(SessionSnapshot::from(&session)))
}
