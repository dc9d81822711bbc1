// src/lib.rs

pub mod config;
pub mod core;

// Re-export
pub use crate::core::client::{JsonClient, PoolConfig};
pub use crate::core::commands::json::{JsonValueType, SetCondition};
pub use crate::core::{Path, ReJsonError, pointer_to_native};
