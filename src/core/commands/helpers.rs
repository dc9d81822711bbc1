// src/core/commands/helpers.rs

//! Shared reply decoding used by the command implementations.

use crate::core::ReJsonError;
use crate::core::protocol::RespFrame;
use bytes::Bytes;

/// Turns a RESP error reply into `ReJsonError::Server`, passing any other frame through.
///
/// The generic `ERR ` prefix is stripped; specific prefixes such as `WRONGTYPE` are kept.
pub fn check_error(reply: RespFrame) -> Result<RespFrame, ReJsonError> {
    match reply {
        RespFrame::Error(msg) => {
            let msg = msg.strip_prefix("ERR ").map(str::to_string).unwrap_or(msg);
            Err(ReJsonError::Server(msg))
        }
        other => Ok(other),
    }
}

/// Expects `+OK`. A null reply yields `false`.
pub fn extract_ok(reply: RespFrame) -> Result<bool, ReJsonError> {
    match check_error(reply)? {
        RespFrame::SimpleString(s) if s == "OK" => Ok(true),
        RespFrame::Null | RespFrame::NullArray => Ok(false),
        other => Err(ReJsonError::unexpected("+OK or null", other)),
    }
}

pub fn extract_integer(reply: RespFrame) -> Result<i64, ReJsonError> {
    match check_error(reply)? {
        RespFrame::Integer(i) => Ok(i),
        other => Err(ReJsonError::unexpected("integer", other)),
    }
}

pub fn extract_optional_integer(reply: RespFrame) -> Result<Option<i64>, ReJsonError> {
    match check_error(reply)? {
        RespFrame::Integer(i) => Ok(Some(i)),
        RespFrame::Null | RespFrame::NullArray => Ok(None),
        other => Err(ReJsonError::unexpected("integer or null", other)),
    }
}

/// Accepts a bulk or simple string; a null reply yields `None`.
pub fn extract_optional_bytes(reply: RespFrame) -> Result<Option<Bytes>, ReJsonError> {
    match check_error(reply)? {
        RespFrame::BulkString(bs) => Ok(Some(bs)),
        RespFrame::SimpleString(s) => Ok(Some(Bytes::from(s))),
        RespFrame::Null | RespFrame::NullArray => Ok(None),
        other => Err(ReJsonError::unexpected("bulk string or null", other)),
    }
}

pub fn extract_optional_string(reply: RespFrame) -> Result<Option<String>, ReJsonError> {
    extract_optional_bytes(reply)?
        .map(|bs| String::from_utf8(bs.to_vec()).map_err(ReJsonError::from))
        .transpose()
}
