// src/core/errors.rs

//! Defines the primary error type for the entire client.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// The main error enum, representing every failure a client call can report.
#[derive(Error, Debug)]
pub enum ReJsonError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Incomplete data in stream")]
    IncompleteData,

    #[error("Syntax error")]
    SyntaxError,

    /// A caller-supplied argument was rejected before anything was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The server answered with a RESP error reply.
    #[error("Server error: {0}")]
    Server(String),

    #[error("Unexpected reply: expected {expected}, got {actual}")]
    UnexpectedReply {
        expected: &'static str,
        actual: String,
    },

    #[error("Connection closed by peer")]
    ConnectionClosed,

    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Connection pool exhausted (max size: {max_size})")]
    PoolExhausted { max_size: usize },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(String),

    /// `JSON.TYPE` answered with a type name this client does not know.
    #[error("Unknown JSON type '{0}'")]
    UnknownType(String),
}

// Manual implementation of Clone because `std::io::Error` is not cloneable.
impl Clone for ReJsonError {
    fn clone(&self) -> Self {
        match self {
            ReJsonError::Io(e) => ReJsonError::Io(Arc::clone(e)),
            ReJsonError::IncompleteData => ReJsonError::IncompleteData,
            ReJsonError::SyntaxError => ReJsonError::SyntaxError,
            ReJsonError::InvalidArgument(s) => ReJsonError::InvalidArgument(s.clone()),
            ReJsonError::Server(s) => ReJsonError::Server(s.clone()),
            ReJsonError::UnexpectedReply { expected, actual } => ReJsonError::UnexpectedReply {
                expected: *expected,
                actual: actual.clone(),
            },
            ReJsonError::ConnectionClosed => ReJsonError::ConnectionClosed,
            ReJsonError::Timeout(d) => ReJsonError::Timeout(*d),
            ReJsonError::PoolExhausted { max_size } => ReJsonError::PoolExhausted {
                max_size: *max_size,
            },
            ReJsonError::Auth(s) => ReJsonError::Auth(s.clone()),
            ReJsonError::Json(s) => ReJsonError::Json(s.clone()),
            ReJsonError::UnknownType(s) => ReJsonError::UnknownType(s.clone()),
        }
    }
}

impl PartialEq for ReJsonError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ReJsonError::Io(e1), ReJsonError::Io(e2)) => e1.to_string() == e2.to_string(),
            (ReJsonError::InvalidArgument(s1), ReJsonError::InvalidArgument(s2)) => s1 == s2,
            (ReJsonError::Server(s1), ReJsonError::Server(s2)) => s1 == s2,
            (
                ReJsonError::UnexpectedReply {
                    expected: e1,
                    actual: a1,
                },
                ReJsonError::UnexpectedReply {
                    expected: e2,
                    actual: a2,
                },
            ) => e1 == e2 && a1 == a2,
            (ReJsonError::Timeout(d1), ReJsonError::Timeout(d2)) => d1 == d2,
            (
                ReJsonError::PoolExhausted { max_size: m1 },
                ReJsonError::PoolExhausted { max_size: m2 },
            ) => m1 == m2,
            (ReJsonError::Auth(s1), ReJsonError::Auth(s2)) => s1 == s2,
            (ReJsonError::Json(s1), ReJsonError::Json(s2)) => s1 == s2,
            (ReJsonError::UnknownType(s1), ReJsonError::UnknownType(s2)) => s1 == s2,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

impl ReJsonError {
    /// Builds an `UnexpectedReply` error from any debuggable reply.
    pub fn unexpected(expected: &'static str, actual: impl std::fmt::Debug) -> Self {
        ReJsonError::UnexpectedReply {
            expected,
            actual: format!("{actual:?}"),
        }
    }

    /// True for failures after which a pooled connection must not be reused.
    pub fn is_connection_fatal(&self) -> bool {
        matches!(
            self,
            ReJsonError::Io(_)
                | ReJsonError::ConnectionClosed
                | ReJsonError::Timeout(_)
                | ReJsonError::SyntaxError
                | ReJsonError::IncompleteData
        )
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for ReJsonError {
    fn from(e: std::io::Error) -> Self {
        ReJsonError::Io(Arc::new(e))
    }
}

impl From<std::str::Utf8Error> for ReJsonError {
    fn from(e: std::str::Utf8Error) -> Self {
        ReJsonError::unexpected("UTF-8 text", e)
    }
}

impl From<std::string::FromUtf8Error> for ReJsonError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        ReJsonError::unexpected("UTF-8 text", e)
    }
}

impl From<serde_json::Error> for ReJsonError {
    fn from(e: serde_json::Error) -> Self {
        ReJsonError::Json(e.to_string())
    }
}
