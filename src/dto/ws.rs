use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::session::SessionSnapshot,
    state::session::{Session, SessionAction},
};

/// Messages accepted from scoreboard WebSocket clients.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(tag = "type")]
pub enum ClientEnvelope {
    /// Hint to create the session if it does not exist yet; not a mutation.
    #[serde(rename = "INIT")]
    Init {
        /// Countdown length for the created session, default when omitted.
        duration: Option<u32>,
    },
    /// A state transition request for the connection's session.
    #[serde(rename = "ACTION")]
    Action {
        /// The requested transition.
        action: SessionAction,
    },
    /// Catch-all for unrecognized envelope types; dropped with a log line.
    #[serde(other)]
    Unknown,
}

/// Messages pushed to scoreboard WebSocket clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "type")]
pub enum ServerEnvelope {
    /// Full session snapshot, fanned out after every state change.
    #[serde(rename = "STATE")]
    State {
        /// The snapshot payload.
        data: SessionSnapshot,
    },
}

impl From<&Session> for ServerEnvelope {
    fn from(session: &Session) -> Self {
        Self::State {
            data: session.into(),
        }
    }
}
