//! Adapters — concrete implementations of the port traits.

pub mod hardware;
pub mod log_sink;
pub mod power;
pub mod state_store;
pub mod time;
