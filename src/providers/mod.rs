//! Sample providers
//!
//! Opaque sources of the values the collectors publish. Each provider may
//! fail; collectors treat a failure as "keep the last value".

mod host;
mod traffic;

use std::time::Duration;

use crate::errors::Result;

pub use host::SysinfoHostStats;
pub use traffic::{RandomTraffic, Route, default_routes};

/// Host resource usage, as percentages in `[0, 100]`
pub trait HostStats: Send + Sync {
    /// CPU utilization over `window`. A zero window compares against the
    /// previous call instead of blocking.
    fn cpu_percent(&self, window: Duration) -> Result<f64>;

    /// Share of physical memory in use.
    fn memory_used_percent(&self) -> Result<f64>;
}

/// Request traffic per route since the previous poll
pub trait TrafficSource: Send + Sync {
    /// One non-negative increment per route, in the order given.
    fn increments(&self, routes: &[Route]) -> Result<Vec<f64>>;
}
