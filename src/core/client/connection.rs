// src/core/client/connection.rs

//! A single asynchronous connection to the document store. Requests are
//! written as RESP frames and exactly one reply frame is read back per request.

use crate::core::ReJsonError;
use crate::core::protocol::{RespFrame, RespFrameCodec};
use bytes::{Bytes, BytesMut};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, trace};

const DEFAULT_BUF_SIZE: usize = 8 * 1024;

/// Settings for opening one connection.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    /// Sent with `AUTH` right after connecting.
    pub password: Option<String>,
    /// Selected with `SELECT` right after connecting when non-zero.
    pub database: u16,
    pub connect_timeout: Duration,
    /// Upper bound on the wait for each reply.
    pub read_timeout: Duration,
    /// Requires the `tls` feature.
    pub tls: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 6379,
            password: None,
            database: 0,
            connect_timeout: Duration::from_secs(2),
            read_timeout: Duration::from_secs(2),
            tls: false,
        }
    }
}

impl ConnectionConfig {
    pub fn from_addr(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

enum Stream {
    Tcp(TcpStream),
    #[cfg(feature = "tls")]
    Tls(Box<tokio_rustls::client::TlsStream<TcpStream>>),
}

/// An open connection with its own read buffer and codec.
pub struct Connection {
    stream: Stream,
    codec: RespFrameCodec,
    read_buf: BytesMut,
    read_timeout: Duration,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("buffered", &self.read_buf.len())
            .field("read_timeout", &self.read_timeout)
            .finish()
    }
}

impl Connection {
    /// Connects, then authenticates and selects the database when configured to.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, ReJsonError> {
        let addr = config.addr();
        let tcp = tokio::time::timeout(config.connect_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| ReJsonError::Timeout(config.connect_timeout))??;
        tcp.set_nodelay(true)?;
        debug!("Connected to {}", addr);

        let stream = if config.tls {
            Self::wrap_tls(config, tcp).await?
        } else {
            Stream::Tcp(tcp)
        };

        let mut conn = Self {
            stream,
            codec: RespFrameCodec,
            read_buf: BytesMut::with_capacity(DEFAULT_BUF_SIZE),
            read_timeout: config.read_timeout,
        };

        if let Some(password) = &config.password {
            let reply = conn
                .send_and_receive(RespFrame::command(
                    "AUTH",
                    [Bytes::copy_from_slice(password.as_bytes())],
                ))
                .await?;
            match reply {
                RespFrame::SimpleString(ref s) if s == "OK" => {}
                RespFrame::Error(e) => return Err(ReJsonError::Auth(e)),
                other => {
                    let msg = format!("unexpected AUTH reply: {other:?}");
                    return Err(ReJsonError::Auth(msg));
                }
            }
        }

        if config.database != 0 {
            let reply = conn
                .send_and_receive(RespFrame::command(
                    "SELECT",
                    [Bytes::from(config.database.to_string())],
                ))
                .await?;
            match reply {
                RespFrame::SimpleString(ref s) if s == "OK" => {}
                RespFrame::Error(e) => return Err(ReJsonError::Server(e)),
                other => return Err(ReJsonError::unexpected("+OK to SELECT", other)),
            }
        }

        Ok(conn)
    }

    #[cfg(feature = "tls")]
    async fn wrap_tls(config: &ConnectionConfig, tcp: TcpStream) -> Result<Stream, ReJsonError> {
        use rustls::pki_types::ServerName;
        use std::sync::Arc;
        use tokio_rustls::TlsConnector;

        let mut root_store = rustls::RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let connector = TlsConnector::from(Arc::new(tls_config));
        let domain = match ServerName::try_from(config.host.clone()) {
            Ok(name) => name,
            Err(e) => {
                let msg = format!("invalid TLS server name: {e}");
                return Err(ReJsonError::InvalidArgument(msg));
            }
        };
        let tls_stream = connector.connect(domain, tcp).await?;
        Ok(Stream::Tls(Box::new(tls_stream)))
    }

    #[cfg(not(feature = "tls"))]
    async fn wrap_tls(_config: &ConnectionConfig, _tcp: TcpStream) -> Result<Stream, ReJsonError> {
        Err(ReJsonError::InvalidArgument(
            "TLS support requires the `tls` feature".into(),
        ))
    }

    /// Sends one frame and waits for a single reply frame.
    ///
    /// RESP error replies are returned as `RespFrame::Error`; interpreting them
    /// is left to the command that was sent.
    pub async fn send_and_receive(&mut self, frame: RespFrame) -> Result<RespFrame, ReJsonError> {
        let mut write_buf = BytesMut::new();
        self.codec.encode(frame, &mut write_buf)?;
        trace!("Sending {} bytes", write_buf.len());

        match &mut self.stream {
            Stream::Tcp(tcp) => {
                tcp.write_all(&write_buf).await?;
                tcp.flush().await?;
            }
            #[cfg(feature = "tls")]
            Stream::Tls(tls) => {
                tls.write_all(&write_buf).await?;
                tls.flush().await?;
            }
        }

        loop {
            // A previous read may already hold the whole reply.
            if let Some(reply) = self.codec.decode(&mut self.read_buf)? {
                return Ok(reply);
            }

            let read_timeout = self.read_timeout;
            let read_buf = &mut self.read_buf;
            let read_result = match &mut self.stream {
                Stream::Tcp(tcp) => {
                    tokio::time::timeout(read_timeout, tcp.read_buf(read_buf)).await
                }
                #[cfg(feature = "tls")]
                Stream::Tls(tls) => {
                    tokio::time::timeout(read_timeout, tls.read_buf(read_buf)).await
                }
            };
            match read_result {
                Ok(Ok(0)) => return Err(ReJsonError::ConnectionClosed),
                Ok(Ok(_)) => {}
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => return Err(ReJsonError::Timeout(read_timeout)),
            }
        }
    }

    /// Sends a `PING` and expects `+PONG`.
    pub async fn ping(&mut self) -> Result<(), ReJsonError> {
        let ping = RespFrame::command("PING", std::iter::empty::<Bytes>());
        let reply = self.send_and_receive(ping).await?;
        match reply {
            RespFrame::SimpleString(ref s) if s == "PONG" => Ok(()),
            other => Err(ReJsonError::unexpected("+PONG", other)),
        }
    }
}
