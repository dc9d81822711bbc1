// src/core/client/pool.rs

//! A bounded pool of reusable connections.
//!
//! Connections are opened lazily, up to `max_size`, and handed out through a
//! semaphore. A checked-out connection goes back to the idle list when its
//! guard is dropped, unless it was marked broken.

use super::connection::{Connection, ConnectionConfig};
use crate::core::ReJsonError;
use crate::core::protocol::RespFrame;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub connection: ConnectionConfig,
    pub max_size: usize,
    /// How long `get` waits for a free slot before giving up.
    pub checkout_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            max_size: 8,
            checkout_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug)]
pub struct Pool {
    config: ConnectionConfig,
    idle: parking_lot::Mutex<Vec<Connection>>,
    semaphore: Arc<Semaphore>,
    max_size: usize,
    checkout_timeout: Duration,
}

impl Pool {
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config: config.connection,
            idle: parking_lot::Mutex::new(Vec::with_capacity(config.max_size)),
            semaphore: Arc::new(Semaphore::new(config.max_size)),
            max_size: config.max_size,
            checkout_timeout: config.checkout_timeout,
        }
    }

    /// Checks out a connection, reusing an idle one when available.
    pub async fn get(&self) -> Result<PooledConnection<'_>, ReJsonError> {
        let permit = tokio::time::timeout(
            self.checkout_timeout,
            self.semaphore.clone().acquire_owned(),
        )
        .await
        .map_err(|_| ReJsonError::PoolExhausted {
            max_size: self.max_size,
        })?
        .map_err(|_| ReJsonError::PoolExhausted {
            max_size: self.max_size,
        })?;

        let idle = { self.idle.lock().pop() };
        let conn = match idle {
            Some(c) => c,
            None => {
                debug!("Opening new pooled connection to {}", self.config.addr());
                Connection::connect(&self.config).await?
            }
        };

        Ok(PooledConnection {
            conn: Some(conn),
            pool: self,
            broken: false,
            _permit: permit,
        })
    }

    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    fn put_back(&self, conn: Connection) {
        self.idle.lock().push(conn);
    }
}

/// A connection checked out from a [`Pool`].
pub struct PooledConnection<'a> {
    conn: Option<Connection>,
    pool: &'a Pool,
    broken: bool,
    _permit: OwnedSemaphorePermit,
}

impl PooledConnection<'_> {
    /// Drops the connection instead of returning it to the pool.
    pub fn mark_broken(&mut self) {
        self.broken = true;
    }

    /// Sends one frame and reads its reply.
    ///
    /// The connection counts as broken until the reply has been read, so a
    /// caller that is cancelled mid-request never returns a socket with a
    /// reply still in flight.
    pub async fn request(&mut self, frame: RespFrame) -> Result<RespFrame, ReJsonError> {
        self.broken = true;
        let reply = self.deref_mut().send_and_receive(frame).await?;
        self.broken = false;
        Ok(reply)
    }

    /// Like [`Connection::ping`], with the same in-flight rule as [`PooledConnection::request`].
    pub async fn ping(&mut self) -> Result<(), ReJsonError> {
        self.broken = true;
        self.deref_mut().ping().await?;
        self.broken = false;
        Ok(())
    }
}

impl std::fmt::Debug for PooledConnection<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledConnection")
            .field("conn", &self.conn)
            .field("broken", &self.broken)
            .finish()
    }
}

impl Drop for PooledConnection<'_> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if self.broken {
                warn!(
                    "Discarding broken connection to {}",
                    self.pool.config.addr()
                );
            } else {
                self.pool.put_back(conn);
            }
        }
    }
}

impl Deref for PooledConnection<'_> {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        // `conn` is only taken in `drop`.
        self.conn.as_ref().expect("connection taken")
    }
}

impl DerefMut for PooledConnection<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // `conn` is only taken in `drop`.
        self.conn.as_mut().expect("connection taken")
    }
}
