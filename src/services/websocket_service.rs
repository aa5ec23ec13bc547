use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dto::ws::{ClientEnvelope, ServerEnvelope},
    services::session_service,
    state::{SharedState, registry::ClientConnection},
};

/// Handle the full lifecycle of one scoreboard WebSocket connection.
pub async fn handle_socket(state: SharedState, socket: WebSocket, session_id: String) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps fan-out flowing while we await inbound frames.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let connection_id = Uuid::new_v4();
    state.registry().register(
        &session_id,
        ClientConnection {
            id: connection_id,
            tx: outbound_tx.clone(),
        },
    );
    info!(session = %session_id, connection = %connection_id, "client connected");

    // New subscribers see the current state right away when the session exists.
    if let Some(session) = state.store().get(&session_id) {
        send_envelope(&outbound_tx, &ServerEnvelope::from(&session));
    }

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => handle_text(&state, &session_id, &text),
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                info!(session = %session_id, connection = %connection_id, "client closed");
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) | Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(session = %session_id, error = %err, "websocket error");
                break;
            }
        }
    }

    cleanup(&state, &session_id, connection_id);
    finalize(writer_task, outbound_tx).await;
}

/// Dispatch one inbound text frame.
///
/// A frame that fails to parse is logged and dropped; the connection and the
/// session stay untouched.
fn handle_text(state: &SharedState, session_id: &str, text: &str) {
    let envelope = match serde_json::from_str::<ClientEnvelope>(text) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!(session = %session_id, error = %err, "dropping malformed client message");
            return;
        }
    };

    match envelope {
        ClientEnvelope::Init { duration } => {
            session_service::init_session(state, session_id, duration);
        }
        ClientEnvelope::Action { action } => {
            if let Err(err) = session_service::apply_action(state, session_id, &action) {
                warn!(session = %session_id, error = %err, "dropping action");
            }
        }
        ClientEnvelope::Unknown => {
            warn!(session = %session_id, "dropping client message with unrecognized type");
        }
    }
}

fn send_envelope(tx: &mpsc::UnboundedSender<Message>, envelope: &ServerEnvelope) {
    match serde_json::to_string(envelope) {
        Ok(payload) => {
            let _ = tx.send(Message::Text(payload.into()));
        }
        Err(err) => warn!(error = %err, "failed to serialize outbound envelope"),
    }
}

/// Drop the registration; the session's last connection winds the countdown
/// down and, when eviction is configured, removes the session itself.
fn cleanup(state: &SharedState, session_id: &str, connection_id: Uuid) {
    let last_one = state.registry().unregister(session_id, connection_id);
    info!(session = %session_id, connection = %connection_id, "client disconnected");

    if last_one {
        if state.config().evict_idle_sessions {
            session_service::delete_session(state, session_id);
        } else {
            state.scheduler().stop(session_id);
        }
    }
}

/// Ensure the writer task winds down before we return from the socket handler.
async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}
