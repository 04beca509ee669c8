//! WebSocket handler for the monitor channel
//!
//! Upgrades `GET /ws/monitor`, pushes the init snapshot, then runs the
//! per-connection session loop: inbound text commands against an idle
//! keepalive timeout, with a dedicated writer task draining the session's
//! outbound queue.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};

use crate::api::routes::AppState;
use crate::db::repositories::AttemptRepository;

use super::events::MonitorEvent;
use super::session::Session;

/// WebSocket upgrade handler
///
/// GET /ws/monitor
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Per-connection session loop
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let (session, mut outbound) = Session::channel(state.monitor.outbound_queue);
    let session_id = session.id().to_string();

    // Assemble the point-in-time snapshot and enqueue it before registering:
    // the queue is FIFO, so the viewer observes `init` ahead of any
    // broadcast it becomes eligible for.
    let init = build_init_event(&state).await;
    if !session.send(&init) {
        return;
    }
    state.registry.register(session);
    tracing::info!(
        session = %session_id,
        viewers = state.registry.len(),
        "monitor connected"
    );

    // Sole writer to the transport; ends when the queue closes or the peer
    // stops accepting writes.
    let writer = tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            if sink.send(message).await.is_err() {
                break;
            }
        }
    });

    let idle = state.monitor.idle_timeout();
    loop {
        match tokio::time::timeout(idle, stream.next()).await {
            Ok(Some(Ok(Message::Text(text)))) => {
                match text.trim().to_ascii_lowercase().as_str() {
                    "ping" => {
                        if !state.registry.send_to(&session_id, &MonitorEvent::pong()) {
                            break;
                        }
                    }
                    "get_stats" => {
                        let stats = state.publisher.snapshot_stats().await;
                        if !state
                            .registry
                            .send_to(&session_id, &MonitorEvent::stats_update(stats))
                        {
                            break;
                        }
                    }
                    // Unrecognized text is ignored: forward compatibility
                    // with clients that send unknown control frames
                    _ => {}
                }
            }
            // Peer closed, or the stream ended
            Ok(Some(Ok(Message::Close(_)))) | Ok(None) => break,
            // Binary and protocol-level ping/pong frames carry no commands
            Ok(Some(Ok(_))) => {}
            // Transport-level read error
            Ok(Some(Err(_))) => break,
            // Idle timeout: not an error, confirm the channel is still live
            Err(_) => {
                if !state.registry.send_to(&session_id, &MonitorEvent::keep_alive()) {
                    break;
                }
            }
        }
    }

    // Closing -> Closed. Runs on every exit path; if a broadcast failure
    // already dropped this session, the second unregister is a no-op.
    if state.registry.unregister(&session_id) {
        tracing::info!(
            session = %session_id,
            viewers = state.registry.len(),
            "monitor disconnected"
        );
    }
    writer.abort();
}

/// Consistent snapshot for a newly connected viewer
///
/// Store failures degrade each piece to an empty value; a viewer still gets
/// its baseline event.
async fn build_init_event(state: &AppState) -> MonitorEvent {
    let pool = state.db.pool();

    let stats = state.publisher.snapshot_stats().await;
    let recent = match AttemptRepository::recent(pool, state.monitor.init_recent_limit).await {
        Ok(attempts) => attempts,
        Err(err) => {
            tracing::warn!(error = %err, "recent attempts query failed for init snapshot");
            Vec::new()
        }
    };
    let chart = match AttemptRepository::chart_summary(pool).await {
        Ok(chart) => chart,
        Err(err) => {
            tracing::warn!(error = %err, "chart query failed for init snapshot");
            Default::default()
        }
    };

    MonitorEvent::init(stats, recent, chart)
}
