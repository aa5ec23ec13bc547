use std::time::Duration;

use dashmap::DashMap;
use tokio::{task::JoinHandle, time};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{dto::ws::ServerEnvelope, state::SharedState};

/// Fixed cadence of the countdown drivers.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Bookkeeping for one live tick driver.
#[derive(Debug)]
struct TickerHandle {
    /// Distinguishes this driver from any replacement under the same id.
    token: Uuid,
    task: JoinHandle<()>,
}

/// Per-session countdown drivers, at most one per session id.
///
/// Each driver is a tokio task ticking once per [`TICK_INTERVAL`]: it pushes
/// the session through [`SessionStore::tick`](crate::state::store::SessionStore::tick)
/// and broadcasts the committed snapshot, independent of any connection
/// activity. Drivers wind down on their own when the countdown is exhausted
/// or the session disappears; [`TimerScheduler::stop`] cancels the next tick.
#[derive(Debug, Default)]
pub struct TimerScheduler {
    tickers: DashMap<String, TickerHandle>,
}

impl TimerScheduler {
    /// Create a scheduler with no drivers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking a session, replacing any driver already attached to it.
    ///
    /// The stop-then-spawn makes starting idempotent: a second start cancels
    /// the first driver before installing its replacement, so exactly one
    /// driver is ever active per session id.
    pub fn start(&self, state: &SharedState, session_id: &str) {
        self.stop(session_id);

        let token = Uuid::new_v4();
        let task = tokio::spawn(run_ticker(state.clone(), session_id.to_owned(), token));
        self.tickers
            .insert(session_id.to_owned(), TickerHandle { token, task });
        debug!(id = %session_id, "started countdown driver");
    }

    /// Cancel a session's driver before its next tick. No-op without one.
    ///
    /// An in-flight tick is never interrupted mid-way; abortion takes effect
    /// at the driver's next await point.
    pub fn stop(&self, session_id: &str) {
        if let Some((_, handle)) = self.tickers.remove(session_id) {
            handle.task.abort();
            debug!(id = %session_id, "stopped countdown driver");
        }
    }

    /// Whether a driver is currently booked for the session.
    pub fn is_running(&self, session_id: &str) -> bool {
        self.tickers.contains_key(session_id)
    }

    /// Drop a driver's own booking when it winds down by itself.
    ///
    /// Guarded by the token so a driver that was already replaced cannot
    /// unbook its successor.
    fn unbook(&self, session_id: &str, token: Uuid) {
        self.tickers
            .remove_if(session_id, |_, handle| handle.token == token);
    }
}

/// Body of one countdown driver task.
async fn run_ticker(state: SharedState, session_id: String, token: Uuid) {
    let mut interval = time::interval_at(time::Instant::now() + TICK_INTERVAL, TICK_INTERVAL);

    loop {
        interval.tick().await;

        let Some(session) = state.store().tick(&session_id) else {
            debug!(id = %session_id, "session gone; winding down countdown driver");
            break;
        };

        state
            .registry()
            .broadcast(&session_id, &ServerEnvelope::from(&session));

        if !session.timer_running {
            info!(id = %session_id, remaining = session.remaining, "countdown stopped");
            break;
        }
    }

    state.scheduler().unbook(&session_id, token);
}
