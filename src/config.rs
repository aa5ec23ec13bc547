//! Application-level configuration sourced from the environment.

use std::{env, str::FromStr};

use tracing::warn;

/// Countdown length used when a session is created without one, in seconds.
const DEFAULT_TIMER_DURATION: u32 = 180;
/// Port the server binds when none is configured.
const DEFAULT_PORT: u16 = 8080;

/// Environment variable overriding the default countdown length.
const DEFAULT_DURATION_ENV: &str = "SCOREBOARD_DEFAULT_DURATION";
/// Environment variable toggling eviction of sessions with no connections.
const EVICT_IDLE_ENV: &str = "SCOREBOARD_EVICT_IDLE";

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Countdown length for sessions created without an explicit duration.
    pub default_timer_duration: u32,
    /// Whether a session is deleted once its last connection goes away.
    pub evict_idle_sessions: bool,
}

impl AppConfig {
    /// Load the configuration from the environment, falling back to the
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .or_else(|_| env::var("SERVER_PORT"))
            .ok()
            .and_then(|value| parse_or_warn("PORT", &value))
            .unwrap_or(DEFAULT_PORT);

        let default_timer_duration = env::var(DEFAULT_DURATION_ENV)
            .ok()
            .and_then(|value| parse_or_warn(DEFAULT_DURATION_ENV, &value))
            .unwrap_or(DEFAULT_TIMER_DURATION);

        let evict_idle_sessions = env::var(EVICT_IDLE_ENV)
            .ok()
            .and_then(|value| parse_or_warn(EVICT_IDLE_ENV, &value))
            .unwrap_or(true);

        Self {
            port,
            default_timer_duration,
            evict_idle_sessions,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            default_timer_duration: DEFAULT_TIMER_DURATION,
            evict_idle_sessions: true,
        }
    }
}

fn parse_or_warn<T: FromStr>(name: &str, value: &str) -> Option<T> {
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(%name, %value, "ignoring unparsable configuration value");
            None
        }
    }
}
