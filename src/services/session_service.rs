use tracing::debug;

use crate::{
    dto::ws::ServerEnvelope,
    error::ServiceError,
    state::{
        SharedState,
        session::{Session, SessionAction},
    },
};

/// Create (or overwrite) a session, defaulting the countdown length from the
/// runtime configuration.
pub fn create_session(state: &SharedState, id: &str, duration: Option<u32>) -> Session {
    let duration = duration.unwrap_or(state.config().default_timer_duration);
    // An overwrite must not leave the previous incarnation's driver ticking.
    state.scheduler().stop(id);
    state.store().create(id, duration)
}

/// Fetch a session, creating it with defaults on first reference.
pub fn get_or_create(state: &SharedState, id: &str, duration: Option<u32>) -> Session {
    match state.store().get(id) {
        Some(session) => session,
        None => create_session(state, id, duration),
    }
}

/// Ensure a session exists, creating it from an `INIT` hint when absent.
///
/// A hint for an existing session changes nothing; a creating hint fans the
/// fresh snapshot out so already-registered connections pick it up.
pub fn init_session(state: &SharedState, id: &str, duration: Option<u32>) {
    if state.store().contains(id) {
        return;
    }
    let session = create_session(state, id, duration);
    broadcast_snapshot(state, &session);
}

/// Apply one action: reduce it against the store, sync the countdown driver
/// with the resulting timer flag, and fan the committed snapshot out.
pub fn apply_action(
    state: &SharedState,
    id: &str,
    action: &SessionAction,
) -> Result<Session, ServiceError> {
    let session = state
        .store()
        .apply(id, action)
        .ok_or_else(|| ServiceError::unknown_session(id))?;

    match action {
        SessionAction::TimerStart => state.scheduler().start(state, id),
        SessionAction::TimerStop | SessionAction::TimerReset | SessionAction::ResetGame => {
            state.scheduler().stop(id);
        }
        _ => {}
    }

    broadcast_snapshot(state, &session);
    Ok(session)
}

/// Delete a session and wind down the driver attached to its id. Idempotent.
pub fn delete_session(state: &SharedState, id: &str) {
    state.scheduler().stop(id);
    state.store().delete(id);
}

/// Push a `STATE` envelope to every connection registered to the session,
/// returning how many writers accepted it.
pub fn broadcast_snapshot(state: &SharedState, session: &Session) -> usize {
    let delivered = state
        .registry()
        .broadcast(&session.id, &ServerEnvelope::from(session));
    debug!(id = %session.id, delivered, "broadcast session snapshot");
    delivered
}
