// src/core/commands/command_trait.rs

//! Defines the trait every `JSON.*` request implements.

use crate::core::ReJsonError;
use crate::core::protocol::RespFrame;
use bitflags::bitflags;
use bytes::Bytes;

bitflags! {
    /// Flags that describe the properties of a command.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct CommandFlags: u32 {
        /// The command modifies the document.
        const WRITE          = 1 << 0;
        /// The command only reads data and may be resent after a broken connection.
        const READONLY       = 1 << 1;
        /// The command touches more than one key.
        const MULTI_KEY      = 1 << 2;
    }
}

/// A request that can be turned into one RESP frame and whose reply can be decoded.
///
/// Implementors only describe arguments; sending is the client's job.
pub trait JsonCommand {
    /// The decoded reply.
    type Output;

    /// The command name sent on the wire, e.g. `JSON.GET`.
    fn name(&self) -> &'static str;

    fn flags(&self) -> CommandFlags;

    /// The arguments that follow the command name, in wire order.
    fn args(&self) -> Vec<Bytes>;

    /// Builds the request frame.
    fn to_frame(&self) -> RespFrame {
        RespFrame::command(self.name(), self.args())
    }

    /// Decodes the reply. Error replies must surface as `ReJsonError::Server`.
    fn parse_reply(&self, reply: RespFrame) -> Result<Self::Output, ReJsonError>;
}
