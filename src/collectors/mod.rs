//! Concrete collectors published by the exporter

mod host;
mod synthetic;

use std::sync::Arc;
use std::time::Duration;

pub use host::HostCollector;
pub use synthetic::SyntheticCollector;

use crate::errors::Result;
use crate::metrics::Registry;
use crate::providers::{RandomTraffic, SysinfoHostStats, default_routes};

/// Label name shared by the host and demo instruments
pub const HOST_LABEL: &str = "Label";

/// Fixed label value the host gauges are published under
pub const HOST_LABEL_VALUE: &str = "label1";

/// Label value of the auto-increment counter.
///
/// Differs from [`HOST_LABEL_VALUE`]: existing dashboards query this exact
/// series, so it must not change.
pub const AUTO_INCREMENT_LABEL_VALUE: &str = "labe1";

/// Register the host and synthetic collectors backed by the real providers.
pub fn register_default_collectors(
    registry: &Registry,
    namespace: &str,
    cpu_window: Duration,
) -> Result<()> {
    registry.register(Arc::new(HostCollector::new(
        namespace,
        Arc::new(SysinfoHostStats::new()),
        cpu_window,
    )?))?;
    registry.register(Arc::new(SyntheticCollector::new(
        namespace,
        Arc::new(RandomTraffic::new()),
        default_routes(),
    )?))?;
    Ok(())
}
