// src/core/client/mod.rs

//! Connection management and the high-level `JsonClient`.

pub mod connection;
pub mod json_client;
pub mod pool;

pub use connection::{Connection, ConnectionConfig};
pub use json_client::JsonClient;
pub use pool::{Pool, PoolConfig, PooledConnection};
