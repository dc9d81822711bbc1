// src/core/commands/json/json_mget.rs

//! Implements `JSON.MGET key [key ...] path` for reading one path from several documents.

use crate::core::ReJsonError;
use crate::core::commands::command_trait::{CommandFlags, JsonCommand};
use crate::core::commands::helpers::{check_error, extract_optional_bytes};
use crate::core::path::Path;
use crate::core::protocol::RespFrame;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct JsonMGet {
    pub keys: Vec<Bytes>,
    pub path: Path,
}

impl JsonMGet {
    /// At least one key is required.
    pub fn new<K, I>(path: Path, keys: I) -> Result<Self, ReJsonError>
    where
        I: IntoIterator<Item = K>,
        K: Into<Bytes>,
    {
        let keys: Vec<Bytes> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            return Err(ReJsonError::InvalidArgument(
                "JSON.MGET requires at least one key".to_string(),
            ));
        }
        Ok(JsonMGet { keys, path })
    }
}

impl JsonCommand for JsonMGet {
    /// One entry per key, in request order; `None` for missing keys or paths.
    type Output = Vec<Option<Bytes>>;

    fn name(&self) -> &'static str {
        "JSON.MGET"
    }

    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY | CommandFlags::MULTI_KEY
    }

    fn args(&self) -> Vec<Bytes> {
        let mut args = self.keys.clone();
        args.push(Bytes::from(&self.path));
        args
    }

    fn parse_reply(&self, reply: RespFrame) -> Result<Vec<Option<Bytes>>, ReJsonError> {
        match check_error(reply)? {
            RespFrame::Array(items) => {
                if items.len() != self.keys.len() {
                    return Err(ReJsonError::UnexpectedReply {
                        expected: "one reply per key",
                        actual: format!("{} replies for {} keys", items.len(), self.keys.len()),
                    });
                }
                items.into_iter().map(extract_optional_bytes).collect()
            }
            other => Err(ReJsonError::unexpected("array", other)),
        }
    }
}
