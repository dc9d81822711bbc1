// src/core/protocol/resp_frame.rs

//! Implements the RESP (REdis Serialization Protocol) frame structure and the
//! corresponding `Encoder` and `Decoder` used on the client side of the wire.

use crate::core::ReJsonError;
use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// The CRLF (Carriage Return, Line Feed) sequence used to terminate lines in RESP.
const CRLF: &[u8] = b"\r\n";
const CRLF_LEN: usize = 2;

// Protocol-level limits so a misbehaving server cannot make the client allocate without bound.
const MAX_FRAME_ELEMENTS: usize = 1_024 * 1_024; // Max elements in an array.
const MAX_BULK_STRING_SIZE: usize = 512 * 1024 * 1024; // 512MB max bulk string size.
const MAX_RECURSION_DEPTH: usize = 256;

/// An enum representing a single frame in the RESP protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum RespFrame {
    SimpleString(String),
    Error(String),
    Integer(i64),
    BulkString(Bytes),
    Null,
    NullArray,
    Array(Vec<RespFrame>),
}

impl RespFrame {
    /// Builds a request frame: an array of bulk strings, command name first.
    pub fn command<I, A>(name: &'static str, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Bytes>,
    {
        let mut frames = vec![RespFrame::BulkString(Bytes::from_static(name.as_bytes()))];
        frames.extend(args.into_iter().map(|a| RespFrame::BulkString(a.into())));
        RespFrame::Array(frames)
    }

    /// A convenience method to encode a frame into a `Vec<u8>`.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, ReJsonError> {
        let mut buf = BytesMut::new();
        RespFrameCodec.encode(self.clone(), &mut buf)?;
        Ok(buf.to_vec())
    }

    /// True for both the null bulk string and the null array.
    pub fn is_null(&self) -> bool {
        matches!(self, RespFrame::Null | RespFrame::NullArray)
    }
}

/// A `tokio_util::codec` implementation for encoding and decoding `RespFrame`s.
#[derive(Debug, Default, Clone, Copy)]
pub struct RespFrameCodec;

impl Encoder<RespFrame> for RespFrameCodec {
    type Error = ReJsonError;

    fn encode(&mut self, item: RespFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let mut itoa_buf = itoa::Buffer::new();
        match item {
            RespFrame::SimpleString(s) => {
                dst.extend_from_slice(b"+");
                dst.extend_from_slice(s.as_bytes());
                dst.extend_from_slice(CRLF);
            }
            RespFrame::Error(s) => {
                dst.extend_from_slice(b"-");
                dst.extend_from_slice(s.as_bytes());
                dst.extend_from_slice(CRLF);
            }
            RespFrame::Integer(i) => {
                dst.extend_from_slice(b":");
                dst.extend_from_slice(itoa_buf.format(i).as_bytes());
                dst.extend_from_slice(CRLF);
            }
            RespFrame::BulkString(b) => {
                dst.extend_from_slice(b"$");
                dst.extend_from_slice(itoa_buf.format(b.len()).as_bytes());
                dst.extend_from_slice(CRLF);
                dst.extend_from_slice(&b);
                dst.extend_from_slice(CRLF);
            }
            RespFrame::Null => {
                dst.extend_from_slice(b"$-1\r\n");
            }
            RespFrame::NullArray => {
                dst.extend_from_slice(b"*-1\r\n");
            }
            RespFrame::Array(arr) => {
                dst.extend_from_slice(b"*");
                dst.extend_from_slice(itoa_buf.format(arr.len()).as_bytes());
                dst.extend_from_slice(CRLF);
                for frame in arr {
                    self.encode(frame, dst)?;
                }
            }
        }
        Ok(())
    }
}

impl Decoder for RespFrameCodec {
    type Item = RespFrame;
    type Error = ReJsonError;

    /// Decodes one complete frame, or returns `Ok(None)` and leaves `src`
    /// untouched when more bytes are needed.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        let mut bytes = &src[..];
        match self.decode_recursive(&mut bytes, 0) {
            Ok(frame) => {
                let len = src.len() - bytes.len();
                src.advance(len);
                Ok(Some(frame))
            }
            Err(ReJsonError::IncompleteData) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl RespFrameCodec {
    fn decode_recursive(&self, bytes: &mut &[u8], depth: usize) -> Result<RespFrame, ReJsonError> {
        if depth > MAX_RECURSION_DEPTH {
            return Err(ReJsonError::SyntaxError);
        }

        if bytes.is_empty() {
            return Err(ReJsonError::IncompleteData);
        }

        match bytes[0] {
            b'+' => self.parse_simple_string(bytes),
            b'-' => self.parse_error(bytes),
            b':' => self.parse_integer(bytes),
            b'$' => self.parse_bulk_string(bytes),
            b'*' => self.parse_array(bytes, depth),
            _ => Err(ReJsonError::SyntaxError),
        }
    }

    /// Returns the bytes up to the next CRLF and advances past it.
    fn parse_line<'a>(&self, bytes: &mut &'a [u8]) -> Result<&'a [u8], ReJsonError> {
        if let Some(pos) = find_crlf(bytes) {
            let line = &bytes[..pos];
            *bytes = &bytes[pos + CRLF_LEN..];
            Ok(line)
        } else {
            Err(ReJsonError::IncompleteData)
        }
    }

    fn parse_length(&self, line: &[u8]) -> Result<isize, ReJsonError> {
        std::str::from_utf8(line)
            .ok()
            .and_then(|s| s.parse::<isize>().ok())
            .ok_or(ReJsonError::SyntaxError)
    }

    fn parse_simple_string(&self, bytes: &mut &[u8]) -> Result<RespFrame, ReJsonError> {
        *bytes = &bytes[1..];
        let line = self.parse_line(bytes)?;
        Ok(RespFrame::SimpleString(
            String::from_utf8_lossy(line).to_string(),
        ))
    }

    fn parse_error(&self, bytes: &mut &[u8]) -> Result<RespFrame, ReJsonError> {
        *bytes = &bytes[1..];
        let line = self.parse_line(bytes)?;
        Ok(RespFrame::Error(String::from_utf8_lossy(line).to_string()))
    }

    fn parse_integer(&self, bytes: &mut &[u8]) -> Result<RespFrame, ReJsonError> {
        *bytes = &bytes[1..];
        let line = self.parse_line(bytes)?;
        let s = String::from_utf8_lossy(line);
        let i = s.parse::<i64>().map_err(|_| ReJsonError::SyntaxError)?;
        Ok(RespFrame::Integer(i))
    }

    /// Parses a Bulk String (e.g., `$5\r\nhello\r\n`).
    fn parse_bulk_string(&self, bytes: &mut &[u8]) -> Result<RespFrame, ReJsonError> {
        *bytes = &bytes[1..];
        let line = self.parse_line(bytes)?;
        let str_len = self.parse_length(line)?;

        if str_len == -1 {
            return Ok(RespFrame::Null);
        }
        if str_len < 0 {
            return Err(ReJsonError::SyntaxError);
        }

        let str_len = str_len as usize;
        if str_len > MAX_BULK_STRING_SIZE {
            return Err(ReJsonError::SyntaxError);
        }

        if bytes.len() < str_len + CRLF_LEN {
            return Err(ReJsonError::IncompleteData);
        }

        if &bytes[str_len..str_len + CRLF_LEN] != CRLF {
            return Err(ReJsonError::SyntaxError);
        }

        let data = Bytes::copy_from_slice(&bytes[..str_len]);
        *bytes = &bytes[str_len + CRLF_LEN..];
        Ok(RespFrame::BulkString(data))
    }

    /// Parses an Array (e.g., `*2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n`).
    fn parse_array(&self, bytes: &mut &[u8], depth: usize) -> Result<RespFrame, ReJsonError> {
        *bytes = &bytes[1..];
        let line = self.parse_line(bytes)?;
        let arr_len = self.parse_length(line)?;

        if arr_len == -1 {
            return Ok(RespFrame::NullArray);
        }
        if arr_len < 0 {
            return Err(ReJsonError::SyntaxError);
        }

        let arr_len = arr_len as usize;
        if arr_len > MAX_FRAME_ELEMENTS {
            return Err(ReJsonError::SyntaxError);
        }

        let mut frames = Vec::with_capacity(arr_len);
        for _ in 0..arr_len {
            frames.push(self.decode_recursive(bytes, depth + 1)?);
        }
        Ok(RespFrame::Array(frames))
    }
}

fn find_crlf(src: &[u8]) -> Option<usize> {
    src.windows(CRLF_LEN).position(|window| window == CRLF)
}
