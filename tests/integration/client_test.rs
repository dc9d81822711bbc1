// tests/integration/client_test.rs

use super::test_helpers::{MockReply, MockServer, args_as_strings, bulk, ok};
use bytes::Bytes;
use rejson::core::client::{Pool, PoolConfig};
use rejson::core::protocol::RespFrame;
use rejson::{JsonClient, Path, ReJsonError};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::timeout;

fn pong() -> MockReply {
    MockReply::Frame(RespFrame::SimpleString("PONG".into()))
}

#[tokio::test]
async fn test_connect_pings_server() {
    let server = MockServer::start(|_| pong()).await;
    let client = JsonClient::connect(server.pool_config()).await.unwrap();
    client.ping().await.unwrap();
    assert_eq!(args_as_strings(&server.received()[0]), vec!["PING"]);
}

#[tokio::test]
async fn test_connect_to_closed_port_fails() {
    let server = MockServer::start(|_| pong()).await;
    let mut config = server.pool_config();
    // Bind then release a port so nothing listens on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    config.connection.port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = JsonClient::connect(config).await.unwrap_err();
    assert!(matches!(err, ReJsonError::Io(_)));
}

#[tokio::test]
async fn test_pool_reuses_idle_connection() {
    let server = MockServer::start(|_| bulk("1")).await;
    let client = server.client();

    for _ in 0..5 {
        assert_eq!(client.get::<i64>("k").await.unwrap(), Some(1));
    }
    assert_eq!(server.connection_count(), 1);
    assert_eq!(client.pool().idle_count(), 1);
}

#[tokio::test]
async fn test_concurrent_calls_stay_within_pool_size() {
    let server = MockServer::start(|_| bulk("1")).await;
    let client = server.client();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let client = client.clone();
        handles.push(tokio::spawn(async move { client.get::<i64>("k").await }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), Some(1));
    }
    assert!(server.connection_count() <= client.pool().max_size());
}

#[tokio::test]
async fn test_pool_exhaustion_times_out() {
    let server = MockServer::start(|_| pong()).await;
    let pool = Pool::new(PoolConfig {
        max_size: 1,
        checkout_timeout: Duration::from_millis(100),
        ..server.pool_config()
    });

    let held = pool.get().await.unwrap();
    let err = pool.get().await.unwrap_err();
    assert_eq!(err, ReJsonError::PoolExhausted { max_size: 1 });

    drop(held);
    assert_eq!(pool.idle_count(), 1);
    assert!(pool.get().await.is_ok());
}

#[tokio::test]
async fn test_read_is_retried_after_connection_drop() {
    let calls = Arc::new(AtomicUsize::new(0));
    let server_calls = calls.clone();
    let server = MockServer::start(move |_| {
        if server_calls.fetch_add(1, Ordering::SeqCst) == 0 {
            MockReply::Close
        } else {
            bulk("\"recovered\"")
        }
    })
    .await;
    let client = server.client();

    let value: Option<String> = client.get("k").await.unwrap();
    assert_eq!(value.as_deref(), Some("recovered"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(server.connection_count(), 2);
}

#[tokio::test]
async fn test_write_is_not_retried_after_connection_drop() {
    let calls = Arc::new(AtomicUsize::new(0));
    let server_calls = calls.clone();
    let server = MockServer::start(move |_| {
        if server_calls.fetch_add(1, Ordering::SeqCst) == 0 {
            MockReply::Close
        } else {
            ok()
        }
    })
    .await;
    let client = server.client();

    let err = client.set("k", &1).await.unwrap_err();
    assert!(err.is_connection_fatal());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    // The broken connection is not handed out again.
    assert_eq!(client.pool().idle_count(), 0);
    assert!(client.set("k", &1).await.unwrap());
    assert_eq!(server.connection_count(), 2);
}

#[tokio::test]
async fn test_read_timeout() {
    let server = MockServer::start(|_| MockReply::NoReply).await;
    let mut config = server.pool_config();
    config.connection.read_timeout = Duration::from_millis(50);
    let client = JsonClient::new(config);

    let err = client.del_at("k", &Path::root()).await.unwrap_err();
    assert_eq!(err, ReJsonError::Timeout(Duration::from_millis(50)));
}

#[tokio::test]
async fn test_auth_and_select_sent_on_connect() {
    let server = MockServer::start(|args| match args[0].as_ref() {
        b"JSON.DEL" => MockReply::Frame(RespFrame::Integer(1)),
        _ => ok(),
    })
    .await;
    let mut config = server.pool_config();
    config.connection.password = Some("secret".into());
    config.connection.database = 2;
    let client = JsonClient::new(config);

    assert_eq!(client.del("k").await.unwrap(), 1);
    let received = server.received();
    assert_eq!(args_as_strings(&received[0]), vec!["AUTH", "secret"]);
    assert_eq!(args_as_strings(&received[1]), vec!["SELECT", "2"]);
    assert_eq!(args_as_strings(&received[2]), vec!["JSON.DEL", "k", "."]);
}

#[tokio::test]
async fn test_auth_rejected() {
    let server = MockServer::start(|_| {
        MockReply::Frame(RespFrame::Error("WRONGPASS invalid password".into()))
    })
    .await;
    let mut config = server.pool_config();
    config.connection.password = Some("wrong".into());
    let client = JsonClient::new(config);

    let err = client.ping().await.unwrap_err();
    assert_eq!(err, ReJsonError::Auth("WRONGPASS invalid password".into()));
}

/// Replies with the requested key as a JSON string, slowly for `slow`.
fn echo_key_server_handler(args: &[Bytes]) -> MockReply {
    let key = String::from_utf8_lossy(&args[1]).to_string();
    let reply = RespFrame::BulkString(Bytes::from(format!("\"{key}\"")));
    if key == "slow" {
        MockReply::Delayed(Duration::from_millis(200), reply)
    } else {
        MockReply::Frame(reply)
    }
}

#[tokio::test]
async fn test_cancelled_call_does_not_leak_its_reply() {
    let server = MockServer::start(echo_key_server_handler).await;
    let client = JsonClient::new(PoolConfig {
        max_size: 1,
        ..server.pool_config()
    });

    let slow = client.get::<String>("slow");
    let cancelled = timeout(Duration::from_millis(50), slow).await;
    assert!(cancelled.is_err());
    // The request was written but its reply never read.
    assert_eq!(client.pool().idle_count(), 0);

    let value = client.get::<String>("fast").await.unwrap();
    assert_eq!(value.as_deref(), Some("fast"));
    assert_eq!(server.connection_count(), 2);
}

#[tokio::test]
async fn test_cancelled_ping_discards_connection() {
    let server = MockServer::start(|_| {
        let pong = RespFrame::SimpleString("PONG".into());
        MockReply::Delayed(Duration::from_millis(200), pong)
    })
    .await;
    let client = server.client();

    let cancelled = timeout(Duration::from_millis(50), client.ping()).await;
    assert!(cancelled.is_err());
    assert_eq!(client.pool().idle_count(), 0);
}

#[tokio::test]
async fn test_error_reply_keeps_connection() {
    let server = MockServer::start(|_| {
        MockReply::Frame(RespFrame::Error("ERR path does not exist".into()))
    })
    .await;
    let client = server.client();

    for _ in 0..3 {
        let err = client.del_at("k", &Path::of(".nope")).await.unwrap_err();
        assert_eq!(err, ReJsonError::Server("path does not exist".into()));
    }
    assert_eq!(client.pool().idle_count(), 1);
    assert_eq!(server.connection_count(), 1);
}
