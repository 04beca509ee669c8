//! End-to-end tests for the monitor WebSocket channel

use std::net::SocketAddr;

use monitor::api::routes::{create_router, AppState};
use monitor::api::ws::EventPayload;
use monitor::client::MonitorClient;
use monitor::config::ServerConfig;
use monitor::db::models::NewAttempt;
use monitor::db::repositories::AttemptRepository;
use monitor::db::DatabaseConnection;

/// Spin up a full server on an ephemeral port
async fn spawn_server(config: ServerConfig) -> (SocketAddr, DatabaseConnection) {
    let db = DatabaseConnection::new_in_memory().await.unwrap();
    db.run_migrations().await.unwrap();

    let state = AppState::new(db.clone(), &config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    (addr, db)
}

async fn connect_client(addr: SocketAddr) -> MonitorClient {
    let mut client = MonitorClient::new(format!("ws://{}/ws/monitor", addr));
    client.connect().await.unwrap();
    client
}

#[tokio::test]
async fn test_init_snapshot_sent_first() {
    let (addr, db) = spawn_server(ServerConfig::default()).await;
    AttemptRepository::record(db.pool(), NewAttempt::new("ilya", true))
        .await
        .unwrap();

    let mut client = connect_client(addr).await;
    let event = client.next_event().await.unwrap().unwrap();

    match event.payload {
        EventPayload::Init {
            stats,
            recent_attempts,
            chart,
        } => {
            assert_eq!(stats.total_attempts, 1);
            assert_eq!(recent_attempts.len(), 1);
            assert_eq!(recent_attempts[0].username, "ilya");
            assert_eq!(chart.successful, 1);
        }
        other => panic!("expected init as first event, got {:?}", other),
    }
}

#[tokio::test]
async fn test_login_attempt_streams_after_init() {
    let (addr, _db) = spawn_server(ServerConfig::default()).await;
    let mut client = connect_client(addr).await;

    let first = client.next_event().await.unwrap().unwrap();
    assert_eq!(first.event_type(), "init");

    // A live login lands as the next event, never ahead of the snapshot
    let http = reqwest::Client::new();
    http.post(format!("http://{}/api/auth/login", addr))
        .json(&serde_json::json!({"username": "ilya", "password": "1111"}))
        .send()
        .await
        .unwrap();

    let second = client.next_event().await.unwrap().unwrap();
    match second.payload {
        EventPayload::LoginAttempt(attempt) => {
            assert_eq!(attempt.username, "ilya");
            assert!(attempt.success);
        }
        other => panic!("expected login_attempt, got {:?}", other),
    }
}

#[tokio::test]
async fn test_broadcast_reaches_every_viewer() {
    let (addr, _db) = spawn_server(ServerConfig::default()).await;

    let mut clients = Vec::new();
    for _ in 0..3 {
        let mut client = connect_client(addr).await;
        let init = client.next_event().await.unwrap().unwrap();
        assert_eq!(init.event_type(), "init");
        clients.push(client);
    }

    let http = reqwest::Client::new();
    http.post(format!("http://{}/api/auth/login", addr))
        .json(&serde_json::json!({"username": "ilya", "password": "1111"}))
        .send()
        .await
        .unwrap();

    for client in &mut clients {
        let event = client.next_event().await.unwrap().unwrap();
        match event.payload {
            EventPayload::LoginAttempt(attempt) => {
                assert_eq!(attempt.username, "ilya");
                assert!(attempt.success);
            }
            other => panic!("expected login_attempt, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_disconnected_viewer_does_not_affect_others() {
    let (addr, _db) = spawn_server(ServerConfig::default()).await;

    let mut staying = connect_client(addr).await;
    staying.next_event().await.unwrap().unwrap();

    let mut leaving = connect_client(addr).await;
    leaving.next_event().await.unwrap().unwrap();
    leaving.close().await.unwrap();

    let http = reqwest::Client::new();
    http.post(format!("http://{}/api/auth/login", addr))
        .json(&serde_json::json!({"username": "admin", "password": "admin123"}))
        .send()
        .await
        .unwrap();

    let event = staying.next_event().await.unwrap().unwrap();
    assert_eq!(event.event_type(), "login_attempt");
}

#[tokio::test]
async fn test_ping_answered_with_pong() {
    let (addr, _db) = spawn_server(ServerConfig::default()).await;
    let mut client = connect_client(addr).await;
    client.next_event().await.unwrap().unwrap();

    client.ping().await.unwrap();
    let event = client.next_event().await.unwrap().unwrap();
    assert_eq!(event.event_type(), "pong");
}

#[tokio::test]
async fn test_get_stats_answered_with_fresh_aggregate() {
    let (addr, db) = spawn_server(ServerConfig::default()).await;
    let mut client = connect_client(addr).await;
    client.next_event().await.unwrap().unwrap();

    // Recorded after the snapshot; a fresh pull must observe it
    AttemptRepository::record(db.pool(), NewAttempt::new("test", false))
        .await
        .unwrap();

    client.request_stats().await.unwrap();
    let event = client.next_event().await.unwrap().unwrap();
    match event.payload {
        EventPayload::StatsUpdate(stats) => {
            assert_eq!(stats.total_attempts, 1);
            assert_eq!(stats.failed, 1);
        }
        other => panic!("expected stats_update, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_text_is_ignored() {
    let (addr, _db) = spawn_server(ServerConfig::default()).await;
    let mut client = connect_client(addr).await;
    client.next_event().await.unwrap().unwrap();

    // Unrecognized control frames draw no reply and no disconnect
    client.send_text("subscribe:everything").await.unwrap();
    client.ping().await.unwrap();

    let event = client.next_event().await.unwrap().unwrap();
    assert_eq!(event.event_type(), "pong");
}

#[tokio::test]
async fn test_idle_viewer_receives_keepalive_and_stays_registered() {
    let mut config = ServerConfig::default();
    config.monitor.idle_timeout_secs = 1;
    let (addr, _db) = spawn_server(config).await;

    let mut client = connect_client(addr).await;
    client.next_event().await.unwrap().unwrap();

    // Stay silent past the idle timeout
    let event = tokio::time::timeout(std::time::Duration::from_secs(5), client.next_event())
        .await
        .expect("keepalive should arrive within the idle window")
        .unwrap()
        .unwrap();
    assert_eq!(event.event_type(), "keep_alive");

    // Still registered: commands keep working
    client.ping().await.unwrap();
    loop {
        let event = client.next_event().await.unwrap().unwrap();
        // Further keepalives may interleave with the pong
        if event.event_type() == "pong" {
            break;
        }
        assert_eq!(event.event_type(), "keep_alive");
    }
}
