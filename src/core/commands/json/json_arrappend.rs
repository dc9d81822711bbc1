// src/core/commands/json/json_arrappend.rs

//! Implements `JSON.ARRAPPEND key path json [json ...]`.

use crate::core::ReJsonError;
use crate::core::commands::command_trait::{CommandFlags, JsonCommand};
use crate::core::commands::helpers::extract_integer;
use crate::core::path::Path;
use crate::core::protocol::RespFrame;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct JsonArrAppend {
    pub key: Bytes,
    pub path: Path,
    pub values_json: Vec<Bytes>,
}

impl JsonArrAppend {
    /// At least one value is required.
    pub fn new<V, I>(key: impl Into<Bytes>, path: Path, values_json: I) -> Result<Self, ReJsonError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Bytes>,
    {
        let values_json: Vec<Bytes> = values_json.into_iter().map(Into::into).collect();
        if values_json.is_empty() {
            return Err(ReJsonError::InvalidArgument(
                "JSON.ARRAPPEND requires at least one value".to_string(),
            ));
        }
        Ok(JsonArrAppend {
            key: key.into(),
            path,
            values_json,
        })
    }
}

impl JsonCommand for JsonArrAppend {
    /// The array length after appending.
    type Output = i64;

    fn name(&self) -> &'static str {
        "JSON.ARRAPPEND"
    }

    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }

    fn args(&self) -> Vec<Bytes> {
        let mut args = Vec::with_capacity(2 + self.values_json.len());
        args.push(self.key.clone());
        args.push(Bytes::from(&self.path));
        args.extend(self.values_json.iter().cloned());
        args
    }

    fn parse_reply(&self, reply: RespFrame) -> Result<i64, ReJsonError> {
        extract_integer(reply)
    }
}
