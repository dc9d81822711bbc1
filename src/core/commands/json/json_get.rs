// src/core/commands/json/json_get.rs

//! Implements `JSON.GET key [path ...]`.

use crate::core::ReJsonError;
use crate::core::commands::command_trait::{CommandFlags, JsonCommand};
use crate::core::commands::helpers::extract_optional_bytes;
use crate::core::path::Path;
use crate::core::protocol::RespFrame;
use bytes::Bytes;

/// With no paths the server answers for the root. With several paths it
/// answers with one object keyed by path expression.
#[derive(Debug, Clone, Default)]
pub struct JsonGet {
    pub key: Bytes,
    pub paths: Vec<Path>,
}

impl JsonGet {
    pub fn new(key: impl Into<Bytes>, paths: impl IntoIterator<Item = Path>) -> Self {
        JsonGet {
            key: key.into(),
            paths: paths.into_iter().collect(),
        }
    }
}

impl JsonCommand for JsonGet {
    /// The raw JSON text, or `None` when the key does not exist.
    type Output = Option<Bytes>;

    fn name(&self) -> &'static str {
        "JSON.GET"
    }

    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }

    fn args(&self) -> Vec<Bytes> {
        let mut args = Vec::with_capacity(1 + self.paths.len());
        args.push(self.key.clone());
        args.extend(self.paths.iter().map(Bytes::from));
        args
    }

    fn parse_reply(&self, reply: RespFrame) -> Result<Option<Bytes>, ReJsonError> {
        extract_optional_bytes(reply)
    }
}
