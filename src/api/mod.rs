//! HTTP surface
//!
//! The landing page and the scrape endpoint.

pub mod services;

pub use services::{ExporterSettings, exporter_routes};
