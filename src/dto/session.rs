use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::state::session::Session;

/// Full session state as pushed to clients and returned by the REST routes.
///
/// The countdown travels as a minutes/seconds pair for display clients, even
/// though the state layer tracks a single seconds value.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Session identifier.
    pub id: String,
    /// Whether a remote controller has announced itself.
    pub remote_connected: bool,
    /// Blue side score.
    pub blue_score: u32,
    /// Red side score.
    pub red_score: u32,
    /// Blue side penalty slots (0-4).
    pub blue_penalties: u8,
    /// Red side penalty slots (0-4).
    pub red_penalties: u8,
    /// Whole minutes left on the countdown.
    pub timer_minutes: u32,
    /// Leftover seconds of the countdown.
    pub timer_seconds: u32,
    /// Whether the countdown is running.
    pub timer_running: bool,
    /// Configured countdown length in seconds.
    pub timer_duration: u32,
}

impl From<&Session> for SessionSnapshot {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            remote_connected: session.remote_connected,
            blue_score: session.blue_score,
            red_score: session.red_score,
            blue_penalties: session.blue_penalties,
            red_penalties: session.red_penalties,
            timer_minutes: session.remaining / 60,
            timer_seconds: session.remaining % 60,
            timer_running: session.timer_running,
            timer_duration: session.timer_duration,
        }
    }
}

/// Payload used to create (or overwrite) a session explicitly.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateSessionRequest {
    /// Identifier for the new session.
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    /// Countdown length in seconds; the configured default when omitted.
    #[validate(range(min = 1, max = 86400))]
    pub duration: Option<u32>,
}

/// Query parameters accepted by the session bootstrap route.
#[derive(Debug, Deserialize)]
pub struct DurationQuery {
    /// Countdown length used only when the fetch has to create the session.
    pub duration: Option<u32>,
}
