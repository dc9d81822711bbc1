// src/core/client/json_client.rs

//! The high-level client. Values are marshalled to and from JSON text with
//! `serde_json`, and every call checks a connection out of the pool, sends a
//! single command and decodes its reply.

use super::pool::{Pool, PoolConfig};
use crate::core::ReJsonError;
use crate::core::commands::json::{
    JsonArrAppend, JsonArrLen, JsonDel, JsonGet, JsonMGet, JsonSet, JsonType, JsonValueType,
    SetCondition,
};
use crate::core::commands::{CommandFlags, JsonCommand};
use crate::core::path::Path;
use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

/// A cloneable handle to a shared connection pool.
#[derive(Debug, Clone)]
pub struct JsonClient {
    pool: Arc<Pool>,
}

impl JsonClient {
    /// Creates a client without opening any connection yet.
    pub fn new(config: PoolConfig) -> Self {
        Self::from_pool(Arc::new(Pool::new(config)))
    }

    /// Creates a client and checks the server is reachable with a `PING`.
    pub async fn connect(config: PoolConfig) -> Result<Self, ReJsonError> {
        let client = Self::new(config);
        client.ping().await?;
        Ok(client)
    }

    pub fn from_pool(pool: Arc<Pool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Arc<Pool> {
        &self.pool
    }

    pub async fn ping(&self) -> Result<(), ReJsonError> {
        let mut conn = self.pool.get().await?;
        conn.ping().await
    }

    /// Sends one command and decodes its reply.
    ///
    /// A read-only command is resent once on a fresh connection when the first
    /// connection fails at the transport level. Writes are never resent. A
    /// connection whose request failed or was cancelled is never reused.
    pub async fn execute<C: JsonCommand>(&self, cmd: &C) -> Result<C::Output, ReJsonError> {
        let frame = cmd.to_frame();
        let mut retried = false;
        loop {
            let mut conn = self.pool.get().await?;
            debug!("Sending {}", cmd.name());
            match conn.request(frame.clone()).await {
                Ok(reply) => return cmd.parse_reply(reply),
                Err(e)
                    if e.is_connection_fatal()
                        && !retried
                        && cmd.flags().contains(CommandFlags::READONLY) =>
                {
                    warn!(
                        "{} failed on a broken connection, retrying: {}",
                        cmd.name(),
                        e
                    );
                    retried = true;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Stores `value` as the whole document at `key`.
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<bool, ReJsonError> {
        self.set_at(key, &Path::ROOT, value, SetCondition::None).await
    }

    /// Stores `value` at `path`. Returns `false` when `condition` was not met.
    pub async fn set_at<T: Serialize + ?Sized>(
        &self,
        key: &str,
        path: &Path,
        value: &T,
        condition: SetCondition,
    ) -> Result<bool, ReJsonError> {
        let json = serde_json::to_vec(value)?;
        let cmd = JsonSet::new(key_bytes(key), path.clone(), json).with_condition(condition);
        self.execute(&cmd).await
    }

    /// Fetches the whole document at `key`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ReJsonError> {
        self.get_at(key, &[Path::ROOT]).await
    }

    /// Fetches one or more paths. With several paths the server replies with
    /// an object keyed by path expression, so `T` should be a map-like type.
    /// An empty `paths` sends only the key and leaves the path to the server.
    pub async fn get_at<T: DeserializeOwned>(
        &self,
        key: &str,
        paths: &[Path],
    ) -> Result<Option<T>, ReJsonError> {
        let cmd = JsonGet::new(key_bytes(key), paths.iter().cloned());
        let reply = self.execute(&cmd).await?;
        reply.map(|json| decode_json(&json)).transpose()
    }

    /// Like [`JsonClient::get_at`] without committing to a concrete type.
    pub async fn get_value(
        &self,
        key: &str,
        paths: &[Path],
    ) -> Result<Option<serde_json::Value>, ReJsonError> {
        self.get_at(key, paths).await
    }

    /// Deletes the whole document, removing the key.
    pub async fn del(&self, key: &str) -> Result<i64, ReJsonError> {
        self.del_at(key, &Path::ROOT).await
    }

    pub async fn del_at(&self, key: &str, path: &Path) -> Result<i64, ReJsonError> {
        let cmd = JsonDel::new(key_bytes(key), path.clone());
        self.execute(&cmd).await
    }

    pub async fn json_type(&self, key: &str) -> Result<Option<JsonValueType>, ReJsonError> {
        self.json_type_at(key, &Path::ROOT).await
    }

    pub async fn json_type_at(
        &self,
        key: &str,
        path: &Path,
    ) -> Result<Option<JsonValueType>, ReJsonError> {
        let cmd = JsonType::new(key_bytes(key), path.clone());
        self.execute(&cmd).await
    }

    /// Reads `path` from every key, keeping the order of `keys`.
    pub async fn mget<T: DeserializeOwned>(
        &self,
        path: &Path,
        keys: &[&str],
    ) -> Result<Vec<Option<T>>, ReJsonError> {
        let cmd = JsonMGet::new(path.clone(), keys.iter().map(|k| key_bytes(k)))?;
        self.execute(&cmd)
            .await?
            .into_iter()
            .map(|item| item.map(|json| decode_json(&json)).transpose())
            .collect()
    }

    pub async fn arr_len(&self, key: &str, path: &Path) -> Result<Option<i64>, ReJsonError> {
        let cmd = JsonArrLen::new(key_bytes(key), path.clone());
        self.execute(&cmd).await
    }

    /// Appends every value to the array at `path`, returning the new length.
    pub async fn arr_append<T: Serialize>(
        &self,
        key: &str,
        path: &Path,
        values: &[T],
    ) -> Result<i64, ReJsonError> {
        let encoded = values
            .iter()
            .map(|v| serde_json::to_vec(v).map(Bytes::from))
            .collect::<Result<Vec<_>, _>>()?;
        let cmd = JsonArrAppend::new(key_bytes(key), path.clone(), encoded)?;
        self.execute(&cmd).await
    }
}

fn key_bytes(key: &str) -> Bytes {
    Bytes::copy_from_slice(key.as_bytes())
}

fn decode_json<T: DeserializeOwned>(json: &[u8]) -> Result<T, ReJsonError> {
    serde_json::from_slice(json).map_err(ReJsonError::from)
}
