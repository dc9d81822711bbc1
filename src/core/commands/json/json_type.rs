// src/core/commands/json/json_type.rs

//! Implements `JSON.TYPE key [path]`.

use crate::core::ReJsonError;
use crate::core::commands::command_trait::{CommandFlags, JsonCommand};
use crate::core::commands::helpers::extract_optional_string;
use crate::core::path::Path;
use crate::core::protocol::RespFrame;
use bytes::Bytes;
use std::fmt;
use std::str::FromStr;

/// The type names the store reports for a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonValueType {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Object,
    Array,
}

impl JsonValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonValueType::Null => "null",
            JsonValueType::Boolean => "boolean",
            JsonValueType::Integer => "integer",
            JsonValueType::Number => "number",
            JsonValueType::String => "string",
            JsonValueType::Object => "object",
            JsonValueType::Array => "array",
        }
    }
}

impl fmt::Display for JsonValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JsonValueType {
    type Err = ReJsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "null" => Ok(JsonValueType::Null),
            "boolean" => Ok(JsonValueType::Boolean),
            "integer" => Ok(JsonValueType::Integer),
            "number" => Ok(JsonValueType::Number),
            "string" => Ok(JsonValueType::String),
            "object" => Ok(JsonValueType::Object),
            "array" => Ok(JsonValueType::Array),
            other => Err(ReJsonError::UnknownType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct JsonType {
    pub key: Bytes,
    pub path: Path,
}

impl JsonType {
    pub fn new(key: impl Into<Bytes>, path: Path) -> Self {
        JsonType {
            key: key.into(),
            path,
        }
    }
}

impl JsonCommand for JsonType {
    /// `None` when the key or path does not exist.
    type Output = Option<JsonValueType>;

    fn name(&self) -> &'static str {
        "JSON.TYPE"
    }

    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }

    fn args(&self) -> Vec<Bytes> {
        vec![self.key.clone(), Bytes::from(&self.path)]
    }

    fn parse_reply(&self, reply: RespFrame) -> Result<Option<JsonValueType>, ReJsonError> {
        extract_optional_string(reply)?
            .map(|name| name.parse())
            .transpose()
    }
}
