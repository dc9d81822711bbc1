// src/core/path.rs

//! The `Path` value passed to every `JSON.*` command, and the translator that
//! turns a JSON Pointer (RFC 6901 style, e.g. `/users/0/name`) into the
//! store's native dot/bracket syntax (e.g. `.["users"].[0].["name"]`).
//!
//! The native expression is opaque to the command layer: it is sent as a
//! single argument and never re-parsed on this side of the wire.

use crate::core::ReJsonError;
use bytes::Bytes;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// The native expression addressing the whole document.
pub const ROOT_EXPRESSION: &str = ".";

/// An immutable location inside a JSON document, held in native syntax.
///
/// Equality and hashing are structural over the expression: no normalization
/// is applied, so `Path::of(".a")` and `Path::of(".[\"a\"]")` are different
/// values even though the store may resolve them to the same node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    expression: Cow<'static, str>,
}

impl Path {
    /// The root path, `.`.
    pub const ROOT: Path = Path {
        expression: Cow::Borrowed(ROOT_EXPRESSION),
    };

    /// Wraps an expression that is already in native syntax. Nothing is validated.
    pub fn of(expression: impl Into<String>) -> Self {
        Path {
            expression: Cow::Owned(expression.into()),
        }
    }

    /// Returns the root path.
    pub fn root() -> Self {
        Self::ROOT
    }

    /// Translates a JSON Pointer into a native path. `None` stands for an absent pointer.
    pub fn from_json_pointer(pointer: Option<&str>) -> Result<Self, ReJsonError> {
        pointer_to_native(pointer).map(Path::of)
    }

    pub fn as_str(&self) -> &str {
        &self.expression
    }

    pub fn is_root(&self) -> bool {
        self.expression == ROOT_EXPRESSION
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::ROOT
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

/// Parses the input as a JSON Pointer, not as native syntax; use [`Path::of`] for that.
impl FromStr for Path {
    type Err = ReJsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::from_json_pointer(Some(s))
    }
}

impl From<&Path> for Bytes {
    fn from(path: &Path) -> Self {
        Bytes::copy_from_slice(path.as_str().as_bytes())
    }
}

impl From<Path> for Bytes {
    fn from(path: Path) -> Self {
        match path.expression {
            Cow::Borrowed(s) => Bytes::from_static(s.as_bytes()),
            Cow::Owned(s) => Bytes::from(s),
        }
    }
}

/// Accumulates one pointer segment with its escapes already resolved.
struct SegmentBuffer {
    text: String,
    looks_numeric: bool,
}

impl SegmentBuffer {
    fn new() -> Self {
        Self {
            text: String::new(),
            looks_numeric: true,
        }
    }

    fn push(&mut self, c: char) {
        if !c.is_ascii_digit() {
            self.looks_numeric = false;
        }
        self.text.push(c);
    }

    /// Appends a character produced by a `~` escape. Such a segment is never an index.
    fn push_escaped(&mut self, c: char) {
        self.looks_numeric = false;
        self.text.push(c);
    }

    /// Emits `.[n]` for an index or `.["key"]` for a key, then resets for the next segment.
    fn flush_into(&mut self, out: &mut String) {
        if self.looks_numeric && !self.text.is_empty() {
            out.push_str(".[");
            out.push_str(&self.text);
            out.push(']');
        } else {
            // Quotes and backslashes inside the key are passed through untouched.
            out.push_str(".[\"");
            out.push_str(&self.text);
            out.push_str("\"]");
        }
        self.text.clear();
        self.looks_numeric = true;
    }
}

/// Converts a JSON Pointer into the native path syntax in a single left-to-right pass.
///
/// - `""` addresses the whole document and yields `.`.
/// - Any other pointer must start with `/`; each `/`-separated segment becomes
///   `.[n]` when it is a non-empty run of ASCII digits and `.["segment"]` otherwise.
/// - `~0` decodes to `~` and `~1` to `/`. A `~` followed by anything else (or by
///   nothing) is kept literally. Any tilde in a segment makes it a string key.
/// - A trailing `/` produces a final empty key, `.[""]`.
///
/// `None` stands for an absent pointer and is rejected.
pub fn pointer_to_native(pointer: Option<&str>) -> Result<String, ReJsonError> {
    let pointer = pointer
        .ok_or_else(|| ReJsonError::InvalidArgument("pointer cannot be null".to_string()))?;

    if pointer.is_empty() {
        return Ok(ROOT_EXPRESSION.to_string());
    }
    let Some(rest) = pointer.strip_prefix('/') else {
        return Err(ReJsonError::InvalidArgument(
            "pointer must start with '/'".to_string(),
        ));
    };

    let mut out = String::with_capacity(pointer.len() * 2);
    let mut segment = SegmentBuffer::new();
    let mut pending_tilde = false;

    for c in rest.chars() {
        if pending_tilde {
            pending_tilde = false;
            match c {
                '0' => {
                    segment.push_escaped('~');
                    continue;
                }
                '1' => {
                    segment.push_escaped('/');
                    continue;
                }
                // Not an escape: keep the tilde, then handle `c` on its own.
                _ => segment.push_escaped('~'),
            }
        }
        match c {
            '~' => pending_tilde = true,
            '/' => segment.flush_into(&mut out),
            _ => segment.push(c),
        }
    }

    if pending_tilde {
        segment.push_escaped('~');
    }
    segment.flush_into(&mut out);

    Ok(out)
}
