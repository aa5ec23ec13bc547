use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Handle used to push messages to one connected scoreboard client.
#[derive(Debug, Clone)]
pub struct ClientConnection {
    /// Identity of this connection within its session.
    pub id: Uuid,
    /// Writer channel drained by the connection's socket task.
    pub tx: mpsc::UnboundedSender<Message>,
}

/// Registry of live connections grouped by session id.
///
/// Owned by the core so the fan-out can answer "which connections are live
/// for session X" at broadcast time; the physical socket I/O stays with the
/// per-connection writer tasks feeding off each [`ClientConnection::tx`].
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: DashMap<String, Vec<ClientConnection>>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a connection to a session id.
    pub fn register(&self, session_id: &str, connection: ClientConnection) {
        self.connections
            .entry(session_id.to_owned())
            .or_default()
            .push(connection);
    }

    /// Detach a connection, returning true when the session has no
    /// connections left (the caller decides what cleanup that triggers).
    pub fn unregister(&self, session_id: &str, connection_id: Uuid) -> bool {
        let Some(mut entry) = self.connections.get_mut(session_id) else {
            return true;
        };
        entry.retain(|connection| connection.id != connection_id);
        let empty = entry.is_empty();
        drop(entry);

        if empty {
            self.connections
                .remove_if(session_id, |_, connections| connections.is_empty());
        }
        empty
    }

    /// Number of connections currently registered for a session.
    pub fn count(&self, session_id: &str) -> usize {
        self.connections
            .get(session_id)
            .map_or(0, |entry| entry.len())
    }

    /// Serialize `message` once and push it to every connection registered
    /// for `session_id`, returning how many writer channels accepted it.
    ///
    /// A session with no registered connections is a no-op. A connection
    /// whose writer has gone away is skipped; its socket task cleans up the
    /// registration on its own close path.
    pub fn broadcast<T>(&self, session_id: &str, message: &T) -> usize
    where
        T: ?Sized + serde::Serialize,
    {
        let Some(connections) = self.connections.get(session_id) else {
            return 0;
        };

        let payload = match serde_json::to_string(message) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(%session_id, error = %err, "failed to serialize broadcast payload");
                return 0;
            }
        };

        let mut delivered = 0;
        for connection in connections.iter() {
            match connection.tx.send(Message::Text(payload.clone().into())) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    debug!(%session_id, connection = %connection.id, "skipping closed connection");
                }
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Ping {
        seq: u32,
    }

    fn connection() -> (ClientConnection, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            ClientConnection {
                id: Uuid::new_v4(),
                tx,
            },
            rx,
        )
    }

    #[test]
    fn broadcast_without_connections_is_a_no_op() {
        let registry = ConnectionRegistry::new();
        assert_eq!(registry.broadcast("alpha", &Ping { seq: 1 }), 0);
    }

    #[test]
    fn broadcast_reaches_every_registered_connection() {
        let registry = ConnectionRegistry::new();
        let (first, mut first_rx) = connection();
        let (second, mut second_rx) = connection();
        registry.register("alpha", first);
        registry.register("alpha", second);

        assert_eq!(registry.broadcast("alpha", &Ping { seq: 7 }), 2);
        assert!(first_rx.try_recv().is_ok());
        assert!(second_rx.try_recv().is_ok());
    }

    #[test]
    fn broadcast_is_scoped_to_the_session_id() {
        let registry = ConnectionRegistry::new();
        let (alpha, mut alpha_rx) = connection();
        let (beta, mut beta_rx) = connection();
        registry.register("alpha", alpha);
        registry.register("beta", beta);

        registry.broadcast("alpha", &Ping { seq: 1 });
        assert!(alpha_rx.try_recv().is_ok());
        assert!(beta_rx.try_recv().is_err());
    }

    #[test]
    fn closed_connections_are_skipped_not_fatal() {
        let registry = ConnectionRegistry::new();
        let (alive, mut alive_rx) = connection();
        let (dead, dead_rx) = connection();
        registry.register("alpha", dead);
        registry.register("alpha", alive);
        drop(dead_rx);

        assert_eq!(registry.broadcast("alpha", &Ping { seq: 3 }), 1);
        assert!(alive_rx.try_recv().is_ok());
    }

    #[test]
    fn per_connection_delivery_preserves_broadcast_order() {
        let registry = ConnectionRegistry::new();
        let (conn, mut rx) = connection();
        registry.register("alpha", conn);

        for seq in 0..3 {
            registry.broadcast("alpha", &Ping { seq });
        }

        let mut seen = Vec::new();
        while let Ok(Message::Text(text)) = rx.try_recv() {
            seen.push(text.to_string());
        }
        assert_eq!(seen, vec![r#"{"seq":0}"#, r#"{"seq":1}"#, r#"{"seq":2}"#]);
    }

    #[test]
    fn unregister_reports_when_the_session_empties() {
        let registry = ConnectionRegistry::new();
        let (first, _first_rx) = connection();
        let (second, _second_rx) = connection();
        let first_id = first.id;
        let second_id = second.id;
        registry.register("alpha", first);
        registry.register("alpha", second);

        assert!(!registry.unregister("alpha", first_id));
        assert_eq!(registry.count("alpha"), 1);
        assert!(registry.unregister("alpha", second_id));
        assert_eq!(registry.count("alpha"), 0);

        // A session that was never registered counts as already empty.
        assert!(registry.unregister("ghost", Uuid::new_v4()));
    }
}
