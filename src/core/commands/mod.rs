// src/core/commands/mod.rs

//! The wire-level command layer. Each command describes its arguments and
//! decodes its own reply; paths travel as single opaque arguments.

pub mod command_trait;
pub mod helpers;
pub mod json;

pub use command_trait::{CommandFlags, JsonCommand};
