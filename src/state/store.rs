use dashmap::DashMap;
use tracing::{debug, info};

use crate::state::session::{Session, SessionAction};

/// Owner of every live session, keyed by caller-supplied id.
///
/// The map is the single source of truth: callers get value snapshots out,
/// never live references. Mutations run under the entry's write guard, so
/// actions and ticks for one id are serialized against each other while other
/// ids stay independent.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with invariant defaults, overwriting any existing
    /// session under the same id (no merge).
    pub fn create(&self, id: &str, timer_duration: u32) -> Session {
        let session = Session::new(id, timer_duration);
        self.sessions.insert(id.to_owned(), session.clone());
        info!(%id, timer_duration, "created session");
        session
    }

    /// Snapshot a session by id.
    pub fn get(&self, id: &str) -> Option<Session> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Whether a session exists for `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    /// Reduce `action` against the session and commit the result.
    ///
    /// Returns the committed next state, or `None` when no session exists for
    /// `id` (in which case nothing is mutated). The reduce-and-commit happens
    /// under the entry guard, so no concurrent mutation can observe or
    /// overwrite this one's pre-image.
    pub fn apply(&self, id: &str, action: &SessionAction) -> Option<Session> {
        let mut entry = self.sessions.get_mut(id)?;
        let next = entry.apply(action);
        *entry = next.clone();
        debug!(%id, ?action, "applied action");
        Some(next)
    }

    /// Advance the session's countdown by one second and commit the result.
    ///
    /// The scheduler's entry point: it bypasses the reducer on purpose.
    /// Returns `None` when the session no longer exists.
    pub fn tick(&self, id: &str) -> Option<Session> {
        let mut entry = self.sessions.get_mut(id)?;
        let next = entry.tick();
        *entry = next.clone();
        Some(next)
    }

    /// Remove a session. Deleting an unknown id is a no-op.
    pub fn delete(&self, id: &str) {
        if self.sessions.remove(id).is_some() {
            info!(%id, "deleted session");
        }
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
