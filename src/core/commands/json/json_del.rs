// src/core/commands/json/json_del.rs

//! Implements `JSON.DEL key [path]`.

use crate::core::ReJsonError;
use crate::core::commands::command_trait::{CommandFlags, JsonCommand};
use crate::core::commands::helpers::extract_integer;
use crate::core::path::Path;
use crate::core::protocol::RespFrame;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct JsonDel {
    pub key: Bytes,
    pub path: Path,
}

impl JsonDel {
    pub fn new(key: impl Into<Bytes>, path: Path) -> Self {
        JsonDel {
            key: key.into(),
            path,
        }
    }
}

impl JsonCommand for JsonDel {
    /// The number of paths deleted. Deleting the root removes the key.
    type Output = i64;

    fn name(&self) -> &'static str {
        "JSON.DEL"
    }

    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }

    fn args(&self) -> Vec<Bytes> {
        vec![self.key.clone(), Bytes::from(&self.path)]
    }

    fn parse_reply(&self, reply: RespFrame) -> Result<i64, ReJsonError> {
        extract_integer(reply)
    }
}
