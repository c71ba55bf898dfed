//! Howard Exporter - a pull-based metrics exporter
//!
//! Samples host CPU and memory usage plus a few synthetic counters on every
//! scrape and serves them in the Prometheus text exposition format.
//!
//! # Architecture
//! - `metrics`: instruments, the collector capability, registry and encoder
//! - `providers`: host statistics and synthetic traffic sources
//! - `collectors`: the concrete collectors published by the exporter
//! - `api`: HTTP handlers (landing page, scrape endpoint)
//! - `runtime`: startup wiring, server mode and shutdown
//! - `config`: static configuration
//! - `system`: logging

pub mod api;
pub mod cli;
pub mod collectors;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod providers;
pub mod runtime;
pub mod system;
