use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the scoreboard backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::session::create_session,
        crate::routes::session::fetch_session,
        crate::routes::session::remove_session,
        crate::routes::session::apply_action,
        crate::routes::websocket::ws_handler,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::session::SessionSnapshot,
            crate::dto::session::CreateSessionRequest,
            crate::dto::ws::ClientEnvelope,
            crate::dto::ws::ServerEnvelope,
            crate::state::session::SessionAction,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "session", description = "Session bootstrap and mutation"),
        (name = "ws", description = "WebSocket push channel for scoreboard clients"),
    )
)]
pub struct ApiDoc;
