// src/core/commands/json/json_set.rs

//! Implements `JSON.SET key path json [NX|XX]`.

use crate::core::ReJsonError;
use crate::core::commands::command_trait::{CommandFlags, JsonCommand};
use crate::core::commands::helpers::extract_ok;
use crate::core::path::Path;
use crate::core::protocol::RespFrame;
use bytes::Bytes;
use std::str::FromStr;

/// Existence condition on the target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetCondition {
    #[default]
    None,
    IfExists,    // XX
    IfNotExists, // NX
}

impl SetCondition {
    /// The wire modifier, if any.
    pub fn as_arg(&self) -> Option<&'static str> {
        match self {
            SetCondition::None => None,
            SetCondition::IfExists => Some("XX"),
            SetCondition::IfNotExists => Some("NX"),
        }
    }
}

impl FromStr for SetCondition {
    type Err = ReJsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NX" => Ok(SetCondition::IfNotExists),
            "XX" => Ok(SetCondition::IfExists),
            _ => Err(ReJsonError::InvalidArgument(format!(
                "unknown set condition '{s}', expected NX or XX"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct JsonSet {
    pub key: Bytes,
    pub path: Path,
    pub value_json: Bytes,
    pub condition: SetCondition,
}

impl JsonSet {
    pub fn new(key: impl Into<Bytes>, path: Path, value_json: impl Into<Bytes>) -> Self {
        JsonSet {
            key: key.into(),
            path,
            value_json: value_json.into(),
            condition: SetCondition::None,
        }
    }

    pub fn with_condition(mut self, condition: SetCondition) -> Self {
        self.condition = condition;
        self
    }
}

impl JsonCommand for JsonSet {
    /// `true` when the value was written, `false` when the condition was not met.
    type Output = bool;

    fn name(&self) -> &'static str {
        "JSON.SET"
    }

    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }

    fn args(&self) -> Vec<Bytes> {
        let mut args = vec![
            self.key.clone(),
            Bytes::from(&self.path),
            self.value_json.clone(),
        ];
        if let Some(modifier) = self.condition.as_arg() {
            args.push(Bytes::from_static(modifier.as_bytes()));
        }
        args
    }

    fn parse_reply(&self, reply: RespFrame) -> Result<bool, ReJsonError> {
        extract_ok(reply)
    }
}
