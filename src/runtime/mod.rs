//! Application lifecycle
//!
//! - `lifetime`: startup wiring and shutdown signalling
//! - `modes`: the HTTP server

pub mod lifetime;
pub mod modes;

pub use modes::run_server;
