// src/core/mod.rs

//! The central module: the path value and translator, the RESP codec, the
//! `JSON.*` command layer and the pooled client built on top of them.

pub mod client;
pub mod commands;
pub mod errors;
pub mod path;
pub mod protocol;

pub use errors::ReJsonError;
pub use path::{Path, pointer_to_native};
