//! Execution modes
//!
//! The exporter only runs as an HTTP server.

pub mod server;

pub use server::run_server;
