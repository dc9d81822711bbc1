// tests/integration/test_helpers.rs

//! A scripted RESP server for exercising the client over real sockets.

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use rejson::JsonClient;
use rejson::core::client::{ConnectionConfig, PoolConfig};
use rejson::core::protocol::{RespFrame, RespFrameCodec};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::codec::Framed;
use tracing_subscriber::EnvFilter;

/// What the mock server does with one request.
pub enum MockReply {
    Frame(RespFrame),
    /// Answer after a pause, holding up later requests on the same connection.
    Delayed(Duration, RespFrame),
    /// Drop the connection without answering.
    Close,
    /// Keep the connection open and never answer.
    NoReply,
}

type Handler = Arc<dyn Fn(&[Bytes]) -> MockReply + Send + Sync>;

pub struct MockServer {
    pub addr: SocketAddr,
    received: Arc<Mutex<Vec<Vec<Bytes>>>>,
    connections: Arc<AtomicUsize>,
}

impl MockServer {
    /// Starts a server on an ephemeral port that answers every request with `handler`.
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&[Bytes]) -> MockReply + Send + Sync + 'static,
    {
        // Initialize tracing (ignore error if already initialized)
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("warn"))
            .with_test_writer()
            .try_init();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handler: Handler = Arc::new(handler);
        let received = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(AtomicUsize::new(0));

        let accept_received = received.clone();
        let accept_connections = connections.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                accept_connections.fetch_add(1, Ordering::SeqCst);
                let handler = handler.clone();
                let received = accept_received.clone();
                tokio::spawn(async move {
                    let mut framed = Framed::new(socket, RespFrameCodec);
                    while let Some(Ok(frame)) = framed.next().await {
                        let RespFrame::Array(items) = frame else {
                            break;
                        };
                        let args: Vec<Bytes> = items
                            .into_iter()
                            .filter_map(|f| match f {
                                RespFrame::BulkString(b) => Some(b),
                                _ => None,
                            })
                            .collect();
                        received.lock().push(args.clone());
                        match handler(&args) {
                            MockReply::Frame(reply) => {
                                if framed.send(reply).await.is_err() {
                                    break;
                                }
                            }
                            MockReply::Delayed(pause, reply) => {
                                tokio::time::sleep(pause).await;
                                if framed.send(reply).await.is_err() {
                                    break;
                                }
                            }
                            MockReply::Close => break,
                            MockReply::NoReply => {}
                        }
                    }
                });
            }
        });

        Self {
            addr,
            received,
            connections,
        }
    }

    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            host: "127.0.0.1".to_string(),
            port: self.addr.port(),
            read_timeout: Duration::from_millis(500),
            ..Default::default()
        }
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            connection: self.connection_config(),
            max_size: 2,
            checkout_timeout: Duration::from_secs(1),
        }
    }

    pub fn client(&self) -> JsonClient {
        JsonClient::new(self.pool_config())
    }

    /// Every request received so far, command name first.
    pub fn received(&self) -> Vec<Vec<Bytes>> {
        self.received.lock().clone()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

pub fn ok() -> MockReply {
    MockReply::Frame(RespFrame::SimpleString("OK".into()))
}

pub fn bulk(s: &str) -> MockReply {
    MockReply::Frame(RespFrame::BulkString(Bytes::copy_from_slice(s.as_bytes())))
}

pub fn args_as_strings(args: &[Bytes]) -> Vec<String> {
    args.iter()
        .map(|b| String::from_utf8_lossy(b).to_string())
        .collect()
}
