// src/core/commands/json/json_arrlen.rs

//! Implements `JSON.ARRLEN key [path]`.

use crate::core::ReJsonError;
use crate::core::commands::command_trait::{CommandFlags, JsonCommand};
use crate::core::commands::helpers::extract_optional_integer;
use crate::core::path::Path;
use crate::core::protocol::RespFrame;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct JsonArrLen {
    pub key: Bytes,
    pub path: Path,
}

impl JsonArrLen {
    pub fn new(key: impl Into<Bytes>, path: Path) -> Self {
        JsonArrLen {
            key: key.into(),
            path,
        }
    }
}

impl JsonCommand for JsonArrLen {
    type Output = Option<i64>;

    fn name(&self) -> &'static str {
        "JSON.ARRLEN"
    }

    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }

    fn args(&self) -> Vec<Bytes> {
        vec![self.key.clone(), Bytes::from(&self.path)]
    }

    fn parse_reply(&self, reply: RespFrame) -> Result<Option<i64>, ReJsonError> {
        extract_optional_integer(reply)
    }
}
